use crate::core::grid::{GridDimensions, ScalarGrid};
use crate::core::io::volume::VolumeFile;
use crate::core::mesh::sink::MeshSink;
use crate::engine::config::{ConfigError, ExtractionConfig};
use crate::engine::error::{EngineError, ExtractionError};
use crate::engine::marching_cubes::{ExtractionStats, polygonise};
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Extracts the isosurface of an in-memory grid.
///
/// # Errors
///
/// Fails with [`ConfigError::InvalidParameter`] for a non-finite isolevel and
/// with [`ExtractionError::Sink`] when the sink rejects a call.
#[instrument(skip_all, name = "extract_workflow")]
pub fn run<S: MeshSink>(
    grid: &ScalarGrid,
    isolevel: f32,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<ExtractionStats, ExtractionError<S::Error>> {
    if !isolevel.is_finite() {
        return Err(EngineError::from(ConfigError::InvalidParameter {
            name: "isolevel",
            reason: format!("expected a finite number, got {}", isolevel),
        })
        .into());
    }
    warn_if_outside_range(grid, isolevel, reporter);

    let stats = reporter
        .phase("Extracting Surface", || {
            polygonise(grid, isolevel, sink, reporter)
        })
        .map_err(ExtractionError::Sink)?;

    info!(
        vertices = stats.vertices,
        triangles = stats.triangles,
        "Extraction workflow complete."
    );
    Ok(stats)
}

/// Loads a packed byte volume and extracts its isosurface.
///
/// The grid is centred on the origin unless `config.offset` is set.
#[instrument(skip_all, name = "extract_volume_workflow", fields(path = %path.as_ref().display()))]
pub fn run_volume<P: AsRef<Path>, S: MeshSink>(
    path: P,
    dims: GridDimensions,
    config: &ExtractionConfig,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<ExtractionStats, ExtractionError<S::Error>> {
    let grid = reporter.phase("Loading Volume", || -> Result<ScalarGrid, EngineError> {
        let mut grid = VolumeFile::read_from_path(&path, dims, config.voxel_size)?;
        if let Some(offset) = config.offset {
            grid.set_offset(offset);
        }
        Ok(grid)
    })?;
    info!(
        sx = dims.sx,
        sy = dims.sy,
        sz = dims.sz,
        voxel_size = config.voxel_size,
        "Loaded volume."
    );

    run(&grid, config.isolevel, sink, reporter)
}

fn warn_if_outside_range(grid: &ScalarGrid, isolevel: f32, reporter: &ProgressReporter) {
    match grid.value_range() {
        Some((min, max)) if isolevel < min || isolevel > max => {
            warn!(isolevel, min, max, "Isolevel lies outside the sample range.");
            reporter.report(Progress::Message(format!(
                "Isolevel {} lies outside the sample range [{}, {}]; the mesh will be empty.",
                isolevel, min, max
            )));
        }
        None => {
            warn!("Grid contains NaN samples; they never count as inside.");
            reporter.report(Progress::Message(
                "Grid contains NaN samples; they never count as inside.".to_string(),
            ));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::volume::VolumeError;
    use crate::core::mesh::triangle_mesh::TriangleMesh;
    use crate::engine::config::ExtractionConfigBuilder;
    use nalgebra::Point3;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Bytes growing by 20 per unit of distance from the centre of an 8^3 block.
    fn ball_bytes() -> Vec<u8> {
        let center = Point3::new(3.5f32, 3.5, 3.5);
        let mut bytes = Vec::new();
        for ix in 0..8 {
            for iy in 0..8 {
                for iz in 0..8 {
                    let p = Point3::new(ix as f32, iy as f32, iz as f32);
                    bytes.push((nalgebra::distance(&p, &center) * 20.0).min(255.0) as u8);
                }
            }
        }
        bytes
    }

    fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            if let Progress::PhaseStart { name } = p {
                sink.lock().unwrap().push(name.to_string());
            }
        }));
        (reporter, events)
    }

    #[test]
    fn volume_file_yields_closed_centred_surface() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ball.raw");
        fs::write(&path, ball_bytes()).unwrap();

        let config = ExtractionConfigBuilder::new().isolevel(40.5).build().unwrap();
        let mut mesh = TriangleMesh::new();
        let (reporter, phases) = recording_reporter();
        let stats = run_volume(&path, GridDimensions::new(8, 8, 8), &config, &mut mesh, &reporter)
            .unwrap();

        assert_eq!(stats.vertices, mesh.vertex_count());
        assert_eq!(stats.triangles, mesh.triangle_count());
        assert!(!mesh.is_empty());
        assert!(mesh.is_closed());

        // Sample (3.5, 3.5, 3.5) maps to (-0.5, -0.5, -0.5) under the centring offset.
        let center = Point3::new(-0.5, -0.5, -0.5);
        for v in mesh.vertices() {
            let d = nalgebra::distance(v, &center);
            assert!((d - 2.025).abs() < 0.05, "vertex {v} at distance {d}");
        }
        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Loading Volume", "Extracting Surface"]
        );
    }

    #[test]
    fn offset_override_shifts_the_mesh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ball.raw");
        fs::write(&path, ball_bytes()).unwrap();
        let dims = GridDimensions::new(8, 8, 8);

        let centred = ExtractionConfigBuilder::new().isolevel(40.5).build().unwrap();
        let shifted = ExtractionConfigBuilder::new()
            .isolevel(40.5)
            .offset(Some(Point3::origin()))
            .build()
            .unwrap();

        let mut a = TriangleMesh::new();
        let mut b = TriangleMesh::new();
        run_volume(&path, dims, &centred, &mut a, &ProgressReporter::new()).unwrap();
        run_volume(&path, dims, &shifted, &mut b, &ProgressReporter::new()).unwrap();

        assert_eq!(a.vertex_count(), b.vertex_count());
        for (pa, pb) in a.vertices().iter().zip(b.vertices()) {
            assert!(((pb - pa) - nalgebra::Vector3::repeat(4.0)).norm() < 1e-5);
        }
    }

    #[test]
    fn truncated_volume_reports_incomplete_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.raw");
        fs::write(&path, vec![0u8; 100]).unwrap();

        let config = ExtractionConfigBuilder::new().isolevel(1.0).build().unwrap();
        let mut mesh = TriangleMesh::new();
        let result = run_volume(
            &path,
            GridDimensions::new(8, 8, 8),
            &config,
            &mut mesh,
            &ProgressReporter::new(),
        );

        assert!(matches!(
            result,
            Err(ExtractionError::Engine(EngineError::Volume {
                source: VolumeError::IncompleteInput {
                    expected: 512,
                    actual: 100
                }
            }))
        ));
        assert!(mesh.is_empty());
    }

    #[test]
    fn non_finite_isolevel_is_rejected() {
        let grid = ScalarGrid::filled(GridDimensions::new(2, 2, 2), 1.0, 1.0, Point3::origin())
            .unwrap();
        let mut mesh = TriangleMesh::new();
        let result = run(&grid, f32::NAN, &mut mesh, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(ExtractionError::Engine(EngineError::Config { .. }))
        ));
    }

    #[test]
    fn isolevel_outside_range_extracts_nothing() {
        let grid = ScalarGrid::filled(GridDimensions::new(3, 3, 3), 1.0, 1.0, Point3::origin())
            .unwrap();
        let mut mesh = TriangleMesh::new();
        let stats = run(&grid, 10.0, &mut mesh, &ProgressReporter::new()).unwrap();
        assert_eq!(stats.cells_visited, 8);
        assert_eq!(stats.triangles, 0);
        assert!(mesh.is_empty());
    }

    fn message_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            if let Progress::Message(msg) = p {
                sink.lock().unwrap().push(msg);
            }
        }));
        (reporter, messages)
    }

    #[test]
    fn isolevel_outside_range_is_reported_to_the_frontend() {
        let grid = ScalarGrid::filled(GridDimensions::new(2, 2, 2), 1.0, 1.0, Point3::origin())
            .unwrap();
        let (reporter, messages) = message_reporter();
        run(&grid, 10.0, &mut TriangleMesh::new(), &reporter).unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("outside the sample range [1, 1]"));
    }

    #[test]
    fn nan_samples_are_reported_to_the_frontend() {
        let mut samples = vec![0.0; 8];
        samples[3] = f32::NAN;
        let grid =
            ScalarGrid::new(GridDimensions::new(2, 2, 2), samples, 1.0, Point3::origin()).unwrap();
        let (reporter, messages) = message_reporter();
        run(&grid, 0.5, &mut TriangleMesh::new(), &reporter).unwrap();

        assert!(messages.lock().unwrap()[0].contains("NaN"));
    }

    #[test]
    fn isolevel_inside_range_sends_no_message() {
        let grid = ScalarGrid::from_fn(GridDimensions::new(2, 2, 2), 1.0, Point3::origin(), |c| {
            c.ix as f32
        })
        .unwrap();
        let (reporter, messages) = message_reporter();
        run(&grid, 0.5, &mut TriangleMesh::new(), &reporter).unwrap();
        assert!(messages.lock().unwrap().is_empty());
    }
}
