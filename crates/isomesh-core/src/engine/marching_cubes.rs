use super::classifier::{EDGE_LATTICE, classify};
use super::progress::{Progress, ProgressReporter};
use super::resolver::EdgeVertexResolver;
use crate::core::grid::{GridCoord, ScalarGrid};
use crate::core::mesh::sink::MeshSink;
use tracing::{info, instrument, trace};

/// Counters describing one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub cells_visited: usize,
    /// Cells whose corners straddle the isolevel.
    pub active_cells: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Edge lookups answered by a vertex emitted for a neighbouring cell.
    pub cache_hits: usize,
}

/// Extracts the isosurface of `grid` at `isolevel` into `sink`.
///
/// Cells are visited with `ix` outermost and `iz` innermost. Vertices are
/// emitted the first time any cell needs them and triangles are emitted as
/// soon as their cell is processed, so points and triangles interleave.
/// Grids with fewer than two samples along any axis produce nothing.
///
/// Progress is reported as one task step per `ix` slab.
///
/// # Errors
///
/// Stops at the first error returned by the sink and returns it unchanged.
#[instrument(skip_all, name = "marching_cubes", fields(isolevel = isolevel))]
pub fn polygonise<S: MeshSink>(
    grid: &ScalarGrid,
    isolevel: f32,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<ExtractionStats, S::Error> {
    let dims = grid.dims();
    info!(
        sx = dims.sx,
        sy = dims.sy,
        sz = dims.sz,
        cells = dims.cell_count(),
        "Extracting isosurface."
    );

    let mut stats = ExtractionStats::default();
    let mut resolver = EdgeVertexResolver::new(grid, isolevel);

    let slabs = dims.sx.saturating_sub(1);
    reporter.report(Progress::TaskStart {
        total_steps: slabs as u64,
    });

    for ix in 0..slabs {
        for iy in 0..dims.sy.saturating_sub(1) {
            for iz in 0..dims.sz.saturating_sub(1) {
                let base = GridCoord::new(ix, iy, iz);
                stats.cells_visited += 1;

                let case = classify(grid, base, isolevel);
                if case.is_trivial() {
                    continue;
                }
                stats.active_cells += 1;

                let mut edge_vertices = [None; 12];
                for edge in case.crossed_edges() {
                    let ((dx, dy, dz), axis) = EDGE_LATTICE[edge];
                    edge_vertices[edge] =
                        Some(resolver.resolve(base.offset(dx, dy, dz), axis, sink)?);
                }

                debug_assert!(
                    case.triangles().flatten().all(|e| edge_vertices[e].is_some()),
                    "case {} uses an uncrossed edge",
                    case.index()
                );
                for [a, b, c] in case.triangles() {
                    let (Some(va), Some(vb), Some(vc)) =
                        (edge_vertices[a], edge_vertices[b], edge_vertices[c])
                    else {
                        continue;
                    };
                    sink.add_triangle([va, vb, vc])?;
                    stats.triangles += 1;
                }
            }
        }
        trace!(ix, triangles = stats.triangles, "Finished slab.");
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    stats.vertices = resolver.vertex_count();
    stats.cache_hits = resolver.cache_hits();
    info!(
        vertices = stats.vertices,
        triangles = stats.triangles,
        active_cells = stats.active_cells,
        "Isosurface extraction complete."
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridDimensions;
    use crate::core::mesh::triangle_mesh::TriangleMesh;
    use nalgebra::Point3;
    use std::collections::HashSet;

    /// Records every sink call in order.
    #[derive(Default)]
    struct CallLog {
        points: Vec<Point3<f32>>,
        triangles: Vec<[usize; 3]>,
        calls: Vec<char>,
    }

    impl MeshSink for CallLog {
        type VertexId = usize;
        type Error = std::convert::Infallible;

        fn add_point(&mut self, position: Point3<f32>) -> Result<usize, Self::Error> {
            self.points.push(position);
            self.calls.push('p');
            Ok(self.points.len() - 1)
        }

        fn add_triangle(&mut self, vertices: [usize; 3]) -> Result<(), Self::Error> {
            self.triangles.push(vertices);
            self.calls.push('t');
            Ok(())
        }
    }

    fn extract(grid: &ScalarGrid, isolevel: f32) -> (TriangleMesh, ExtractionStats) {
        let mut mesh = TriangleMesh::new();
        let stats = polygonise(grid, isolevel, &mut mesh, &ProgressReporter::new()).unwrap();
        (mesh, stats)
    }

    fn sphere_grid(n: usize, center: Point3<f32>) -> ScalarGrid {
        ScalarGrid::from_fn(GridDimensions::new(n, n, n), 1.0, Point3::origin(), |c| {
            (Point3::new(c.ix as f32, c.iy as f32, c.iz as f32) - center).norm()
        })
        .unwrap()
    }

    #[test]
    fn single_inside_corner_yields_one_triangle() {
        let grid = ScalarGrid::from_fn(GridDimensions::new(2, 2, 2), 1.0, Point3::origin(), |c| {
            if c == GridCoord::new(0, 0, 0) { 0.0 } else { 10.0 }
        })
        .unwrap();
        let mut log = CallLog::default();
        let stats = polygonise(&grid, 5.0, &mut log, &ProgressReporter::new()).unwrap();

        assert_eq!(log.calls, vec!['p', 'p', 'p', 't']);
        assert_eq!(
            log.points,
            vec![
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.5),
                Point3::new(0.0, 0.5, 0.0),
            ]
        );
        // Edges 0, 8, 3 in table order.
        assert_eq!(log.triangles, vec![[0, 2, 1]]);
        assert_eq!(
            stats,
            ExtractionStats {
                cells_visited: 1,
                active_cells: 1,
                vertices: 3,
                triangles: 1,
                cache_hits: 0,
            }
        );
    }

    #[test]
    fn uniform_fields_produce_nothing() {
        let dims = GridDimensions::new(4, 3, 5);
        for value in [10.0, 0.0] {
            let grid = ScalarGrid::filled(dims, value, 1.0, Point3::origin()).unwrap();
            let (mesh, stats) = extract(&grid, 5.0);
            assert!(mesh.is_empty());
            assert_eq!(stats.cells_visited, dims.cell_count());
            assert_eq!(stats.active_cells, 0);
        }
    }

    #[test]
    fn flat_grids_have_no_cells() {
        for dims in [
            GridDimensions::new(1, 4, 4),
            GridDimensions::new(4, 1, 4),
            GridDimensions::new(4, 4, 1),
        ] {
            let grid =
                ScalarGrid::from_fn(dims, 1.0, Point3::origin(), |c| (c.ix + c.iy + c.iz) as f32)
                    .unwrap();
            let (mesh, stats) = extract(&grid, 1.5);
            assert!(mesh.is_empty());
            assert_eq!(stats.cells_visited, 0);
        }
    }

    #[test]
    fn neighbouring_cells_share_edge_vertices() {
        // A plane at y = 0.5 cuts both cells of a 3x2x2 grid through all y edges.
        let grid = ScalarGrid::from_fn(GridDimensions::new(3, 2, 2), 1.0, Point3::origin(), |c| {
            c.iy as f32
        })
        .unwrap();
        let (mesh, stats) = extract(&grid, 0.5);

        assert_eq!(stats.active_cells, 2);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(stats.cache_hits, 2);

        let unique: HashSet<_> = mesh
            .vertices()
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits(), p.z.to_bits()))
            .collect();
        assert_eq!(unique.len(), mesh.vertex_count());
        assert!(mesh.vertices().iter().all(|p| p.y == 0.5));
    }

    #[test]
    fn every_triangle_references_earlier_points() {
        let grid = sphere_grid(7, Point3::new(3.1, 2.9, 3.2));
        let mut log = CallLog::default();
        polygonise(&grid, 2.2, &mut log, &ProgressReporter::new()).unwrap();

        let mut emitted = 0;
        let mut tri = 0;
        for call in &log.calls {
            match *call {
                'p' => emitted += 1,
                _ => {
                    assert!(log.triangles[tri].iter().all(|&id| id < emitted));
                    tri += 1;
                }
            }
        }
        assert!(tri > 0);
    }

    #[test]
    fn sphere_surface_is_closed_genus_zero() {
        let center = Point3::new(3.3, 3.4, 3.2);
        let grid = sphere_grid(8, center);
        let (mesh, stats) = extract(&grid, 2.05);

        assert!(mesh.is_closed());
        let edges = mesh.edge_usage().len() as i64;
        let euler = mesh.vertex_count() as i64 - edges + mesh.triangle_count() as i64;
        assert_eq!(euler, 2);
        assert!(stats.cache_hits > 0);

        for p in mesh.vertices() {
            assert!(((p - center).norm() - 2.05).abs() < 0.1);
        }
    }

    #[test]
    fn repeated_extractions_are_identical() {
        let grid = sphere_grid(6, Point3::new(2.4, 2.6, 2.5));
        let (first, first_stats) = extract(&grid, 1.7);
        let (second, second_stats) = extract(&grid, 1.7);
        assert_eq!(first, second);
        assert_eq!(first_stats, second_stats);
    }

    #[test]
    fn vertices_use_voxel_size_and_offset() {
        let mut grid = ScalarGrid::from_fn(GridDimensions::new(2, 2, 2), 2.0, Point3::origin(), |c| {
            if c == GridCoord::new(0, 0, 0) { 0.0 } else { 10.0 }
        })
        .unwrap();
        grid.set_offset(Point3::new(10.0, 20.0, 30.0));
        let (mesh, _) = extract(&grid, 5.0);
        assert_eq!(mesh.vertices()[0], Point3::new(11.0, 20.0, 30.0));
    }

    #[test]
    fn samples_on_the_isolevel_interpolate_to_midpoints() {
        let grid = ScalarGrid::filled(GridDimensions::new(2, 2, 2), 5.0, 1.0, Point3::origin())
            .unwrap();
        let (mesh, stats) = extract(&grid, 5.0);
        assert_eq!(stats.active_cells, 1);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 6);
        for p in mesh.vertices() {
            let halves = [p.x, p.y, p.z].iter().filter(|&&c| c == 0.5).count();
            assert_eq!(halves, 1);
        }
    }

    #[test]
    fn sink_errors_stop_the_scan() {
        struct Limited(usize);
        impl MeshSink for Limited {
            type VertexId = usize;
            type Error = String;
            fn add_point(&mut self, _: Point3<f32>) -> Result<usize, String> {
                Ok(0)
            }
            fn add_triangle(&mut self, _: [usize; 3]) -> Result<(), String> {
                if self.0 == 0 {
                    return Err("triangle budget exhausted".to_string());
                }
                self.0 -= 1;
                Ok(())
            }
        }

        let grid = sphere_grid(6, Point3::new(2.4, 2.6, 2.5));
        let result = polygonise(&grid, 1.7, &mut Limited(3), &ProgressReporter::new());
        assert_eq!(result, Err("triangle budget exhausted".to_string()));
    }

    #[test]
    fn progress_reports_one_step_per_slab() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;

        let steps = Arc::new(AtomicU64::new(0));
        let total = Arc::new(AtomicU64::new(0));
        let (s, t) = (steps.clone(), total.clone());
        let reporter = ProgressReporter::with_callback(Box::new(move |p| match p {
            Progress::TaskStart { total_steps } => t.store(total_steps, Ordering::SeqCst),
            Progress::TaskIncrement => {
                s.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }));

        let grid = sphere_grid(5, Point3::new(2.1, 2.2, 1.9));
        let mut mesh = TriangleMesh::new();
        polygonise(&grid, 1.3, &mut mesh, &reporter).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 4);
        assert_eq!(steps.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn every_tabled_triangle_reaches_the_sink() {
        let grid = sphere_grid(8, Point3::new(3.3, 3.4, 3.2));
        let dims = grid.dims();
        let mut expected = 0;
        for ix in 0..dims.sx - 1 {
            for iy in 0..dims.sy - 1 {
                for iz in 0..dims.sz - 1 {
                    expected += classify(&grid, GridCoord::new(ix, iy, iz), 2.05).triangle_count();
                }
            }
        }

        let (mesh, stats) = extract(&grid, 2.05);
        assert!(expected > 0);
        assert_eq!(stats.triangles, expected);
        assert_eq!(mesh.triangle_count(), expected);
    }
}
