pub mod extract;
pub mod surface;

use isomesh::core::mesh::triangle_mesh::TriangleMesh;
use isomesh::engine::marching_cubes::ExtractionStats;
use std::fmt::Write;

/// Human-readable report of an extracted mesh.
pub fn format_summary(mesh: &TriangleMesh, stats: &ExtractionStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cells:     {} visited, {} active",
        stats.cells_visited, stats.active_cells
    );
    let _ = writeln!(
        out,
        "Mesh:      {} vertices, {} triangles ({} shared edge lookups)",
        stats.vertices, stats.triangles, stats.cache_hits
    );
    match mesh.bounding_box() {
        Some((min, max)) => {
            let _ = writeln!(
                out,
                "Bounds:    ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
            let _ = writeln!(out, "Area:      {:.3}", mesh.surface_area());
            let _ = write!(
                out,
                "Closed:    {}",
                if mesh.is_closed() { "yes" } else { "no" }
            );
        }
        None => {
            let _ = write!(out, "The isolevel does not cross the grid; the mesh is empty.");
        }
    }
    out
}
