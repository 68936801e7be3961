use super::sink::MeshSink;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh already holds {count} vertices; ids are limited to 32 bits")]
    TooManyVertices { count: usize },
}

/// Collects an extraction into vertex and index buffers with sequential ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Point3<f32>>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.vertices.is_empty()
    }

    pub fn triangle_positions(&self, index: usize) -> Option<[Point3<f32>; 3]> {
        self.triangles
            .get(index)
            .map(|t| t.map(|id| self.vertices[id as usize]))
    }

    /// Axis-aligned bounds of all vertices as `(min, max)`.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().skip(1).fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    pub fn surface_area(&self) -> f32 {
        (0..self.triangle_count())
            .filter_map(|i| self.triangle_positions(i))
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Counts how many triangles use each undirected edge.
    ///
    /// A closed surface uses every edge exactly twice; boundary edges appear once.
    pub fn edge_usage(&self) -> HashMap<(u32, u32), usize> {
        let mut usage = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *usage.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        usage
    }

    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_usage().values().all(|&n| n == 2)
    }
}

impl MeshSink for TriangleMesh {
    type VertexId = u32;
    type Error = MeshError;

    fn add_point(&mut self, position: Point3<f32>) -> Result<u32, MeshError> {
        let id = next_vertex_id(self.vertices.len())?;
        self.vertices.push(position);
        Ok(id)
    }

    fn add_triangle(&mut self, vertices: [u32; 3]) -> Result<(), MeshError> {
        self.triangles.push(vertices);
        Ok(())
    }
}

fn next_vertex_id(count: usize) -> Result<u32, MeshError> {
    u32::try_from(count).map_err(|_| MeshError::TooManyVertices { count })
}
