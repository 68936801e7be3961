use crate::core::grid::GridDimensions;
use crate::core::io::atoms::AtomCsvFile;
use crate::core::mesh::sink::MeshSink;
use crate::core::models::atom::Atom;
use crate::engine::config::SurfaceConfig;
use crate::engine::error::{EngineError, ExtractionError};
use crate::engine::marching_cubes::{ExtractionStats, polygonise};
use crate::engine::progress::ProgressReporter;
use crate::engine::surface_field::build_surface_grid;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceResult {
    /// Dimensions of the sampled grid.
    pub grid_dims: GridDimensions,
    pub stats: ExtractionStats,
}

/// Meshes the probe-expanded van der Waals surface of `atoms`.
#[instrument(skip_all, name = "surface_workflow", fields(atoms = atoms.len()))]
pub fn run<S: MeshSink>(
    atoms: &[Atom],
    config: &SurfaceConfig,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<SurfaceResult, ExtractionError<S::Error>> {
    let grid = reporter.phase("Sampling Atoms", || build_surface_grid(atoms, config))?;
    let grid_dims = grid.dims();

    let stats = reporter
        .phase("Extracting Surface", || {
            polygonise(&grid, config.isolevel, sink, reporter)
        })
        .map_err(ExtractionError::Sink)?;

    info!(
        sx = grid_dims.sx,
        sy = grid_dims.sy,
        sz = grid_dims.sz,
        triangles = stats.triangles,
        "Surface workflow complete."
    );
    Ok(SurfaceResult { grid_dims, stats })
}

/// Reads atoms from a CSV file and meshes their surface.
#[instrument(skip_all, name = "surface_file_workflow", fields(path = %path.as_ref().display()))]
pub fn run_file<P: AsRef<Path>, S: MeshSink>(
    path: P,
    config: &SurfaceConfig,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<SurfaceResult, ExtractionError<S::Error>> {
    let atoms = reporter.phase("Loading Atoms", || -> Result<Vec<Atom>, EngineError> {
        Ok(AtomCsvFile::read_from_path(&path)?)
    })?;
    info!(count = atoms.len(), "Loaded atoms.");
    run(&atoms, config, sink, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::triangle_mesh::TriangleMesh;
    use crate::engine::config::SurfaceConfigBuilder;
    use nalgebra::Point3;
    use std::fs;
    use tempfile::tempdir;

    fn euler_characteristic(mesh: &TriangleMesh) -> i64 {
        mesh.vertex_count() as i64 - mesh.edge_usage().len() as i64 + mesh.triangle_count() as i64
    }

    #[test]
    fn single_atom_gives_closed_sphere_at_expanded_radius() {
        let atoms = vec![Atom::with_radius("C", Point3::origin(), 1.0)];
        let config = SurfaceConfigBuilder::new().probe_radius(0.4).build().unwrap();
        let mut mesh = TriangleMesh::new();

        let result = run(&atoms, &config, &mut mesh, &ProgressReporter::new()).unwrap();

        assert_eq!(result.grid_dims, GridDimensions::new(9, 9, 9));
        assert_eq!(result.stats.triangles, mesh.triangle_count());
        assert!(mesh.is_closed());
        assert_eq!(euler_characteristic(&mesh), 2);
        for v in mesh.vertices() {
            let d = v.coords.norm();
            assert!((d - 1.4).abs() < 0.05, "vertex {v} at distance {d}");
        }
    }

    #[test]
    fn overlapping_atoms_merge_into_one_closed_surface() {
        let atoms = vec![
            Atom::with_radius("C", Point3::new(0.0, 0.0, 0.0), 1.2),
            Atom::with_radius("C", Point3::new(1.5, 0.3, -0.4), 1.0),
        ];
        let mut mesh = TriangleMesh::new();
        run(&atoms, &SurfaceConfig::default(), &mut mesh, &ProgressReporter::new()).unwrap();

        assert!(mesh.is_closed());
        assert_eq!(euler_characteristic(&mesh), 2);
    }

    #[test]
    fn empty_atom_list_is_an_engine_error() {
        let mut mesh = TriangleMesh::new();
        let result = run(&[], &SurfaceConfig::default(), &mut mesh, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(ExtractionError::Engine(EngineError::EmptyAtomSet))
        ));
    }

    #[test]
    fn csv_file_drives_the_workflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atoms.csv");
        fs::write(&path, "element,x,y,z\nO,0.0,0.0,0.0\nH,0.96,0.0,0.0\n").unwrap();

        let mut mesh = TriangleMesh::new();
        let result = run_file(&path, &SurfaceConfig::default(), &mut mesh, &ProgressReporter::new())
            .unwrap();
        assert!(result.stats.triangles > 0);
        assert!(mesh.is_closed());
    }

    #[test]
    fn missing_csv_file_is_an_engine_error() {
        let dir = tempdir().unwrap();
        let mut mesh = TriangleMesh::new();
        let result = run_file(
            dir.path().join("missing.csv"),
            &SurfaceConfig::default(),
            &mut mesh,
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(ExtractionError::Engine(EngineError::AtomFile { .. }))
        ));
    }
}
