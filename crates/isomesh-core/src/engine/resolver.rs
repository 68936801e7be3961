use super::cache::{EdgeVertexCache, edge_key};
use crate::core::grid::{Axis, GridCoord, ScalarGrid};
use crate::core::mesh::sink::MeshSink;
use nalgebra::Point3;

/// Position along an edge where the field crosses `isolevel`, as a fraction of
/// the edge length from `v0`. Edges with equal end values resolve to the midpoint.
#[inline]
pub fn edge_parameter(v0: f32, v1: f32, isolevel: f32) -> f32 {
    if v1 == v0 {
        0.5
    } else {
        (isolevel - v0) / (v1 - v0)
    }
}

/// Turns crossed lattice edges into sink vertices, one vertex per edge.
pub struct EdgeVertexResolver<'g, Id> {
    grid: &'g ScalarGrid,
    isolevel: f32,
    cache: EdgeVertexCache<Id>,
}

impl<'g, Id: Copy> EdgeVertexResolver<'g, Id> {
    pub fn new(grid: &'g ScalarGrid, isolevel: f32) -> Self {
        Self {
            grid,
            isolevel,
            cache: EdgeVertexCache::new(),
        }
    }

    /// Returns the vertex of the edge starting at `base` and running along
    /// `axis`, registering it with `sink` on first use.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by [`MeshSink::add_point`].
    pub fn resolve<S>(&mut self, base: GridCoord, axis: Axis, sink: &mut S) -> Result<Id, S::Error>
    where
        S: MeshSink<VertexId = Id>,
    {
        let dims = self.grid.dims();
        let key = edge_key(&dims, base, axis);
        if let Some(id) = self.cache.get(key) {
            return Ok(id);
        }

        let index = dims.linear_index(base);
        let v0 = self.grid.value_at_index(index);
        let v1 = self.grid.value_at_index(index + dims.stride(axis));
        let t = edge_parameter(v0, v1, self.isolevel);

        let lattice = Point3::new(base.ix as f32, base.iy as f32, base.iz as f32) + axis.unit() * t;
        let id = sink.add_point(self.grid.world_position(lattice))?;
        self.cache.insert(key, id);
        Ok(id)
    }

    /// Number of distinct vertices emitted so far.
    pub fn vertex_count(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> usize {
        self.cache.hits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridDimensions;
    use crate::core::mesh::triangle_mesh::TriangleMesh;

    fn ramp_grid(voxel_size: f32, offset: Point3<f32>) -> ScalarGrid {
        ScalarGrid::from_fn(GridDimensions::new(2, 2, 2), voxel_size, offset, |c| {
            10.0 * c.ix as f32
        })
        .unwrap()
    }

    #[test]
    fn edge_parameter_interpolates_linearly() {
        assert_eq!(edge_parameter(0.0, 10.0, 5.0), 0.5);
        assert_eq!(edge_parameter(2.0, 6.0, 3.0), 0.25);
        assert_eq!(edge_parameter(10.0, 0.0, 2.5), 0.75);
    }

    #[test]
    fn edge_parameter_uses_midpoint_for_flat_edges() {
        assert_eq!(edge_parameter(5.0, 5.0, 5.0), 0.5);
        assert_eq!(edge_parameter(3.0, 3.0, 7.0), 0.5);
    }

    #[test]
    fn resolve_places_vertex_in_world_space() {
        let grid = ramp_grid(2.0, Point3::new(-1.0, -2.0, -3.0));
        let mut mesh = TriangleMesh::new();
        let mut resolver = EdgeVertexResolver::new(&grid, 5.0);

        let id = resolver.resolve(GridCoord::new(0, 1, 0), Axis::X, &mut mesh).unwrap();
        assert_eq!(id, 0);
        assert_eq!(mesh.vertices()[0], Point3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn resolve_reuses_cached_vertex() {
        let grid = ramp_grid(1.0, Point3::origin());
        let mut mesh = TriangleMesh::new();
        let mut resolver = EdgeVertexResolver::new(&grid, 5.0);

        let first = resolver.resolve(GridCoord::new(0, 0, 1), Axis::X, &mut mesh).unwrap();
        let other = resolver.resolve(GridCoord::new(0, 1, 1), Axis::X, &mut mesh).unwrap();
        let again = resolver.resolve(GridCoord::new(0, 0, 1), Axis::X, &mut mesh).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(resolver.vertex_count(), 2);
        assert_eq!(resolver.cache_hits(), 1);
    }

    #[test]
    fn sink_errors_are_propagated() {
        struct Full;
        impl MeshSink for Full {
            type VertexId = u32;
            type Error = &'static str;
            fn add_point(&mut self, _: Point3<f32>) -> Result<u32, &'static str> {
                Err("full")
            }
            fn add_triangle(&mut self, _: [u32; 3]) -> Result<(), &'static str> {
                Ok(())
            }
        }

        let grid = ramp_grid(1.0, Point3::origin());
        let mut resolver = EdgeVertexResolver::new(&grid, 5.0);
        let result = resolver.resolve(GridCoord::new(0, 0, 0), Axis::X, &mut Full);
        assert_eq!(result, Err("full"));
        assert_eq!(resolver.vertex_count(), 0);
    }
}
