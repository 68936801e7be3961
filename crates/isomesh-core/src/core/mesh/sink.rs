use nalgebra::Point3;

/// Receives the vertices and triangles produced by an extraction.
///
/// Calls arrive in cell-scan order with points and triangles interleaved.
/// Every id passed to [`MeshSink::add_triangle`] was returned by an earlier
/// [`MeshSink::add_point`] call of the same extraction. Returning an error from
/// either method aborts the extraction and hands the error back to the caller.
pub trait MeshSink {
    /// Identifier the sink assigns to a registered vertex.
    type VertexId: Copy;

    /// The error type reported by the sink.
    type Error;

    /// Registers a new vertex at a world-space position.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot store the vertex.
    fn add_point(&mut self, position: Point3<f32>) -> Result<Self::VertexId, Self::Error>;

    /// Registers a triangle over three previously returned vertex ids.
    ///
    /// No winding order is implied.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot store the triangle.
    fn add_triangle(&mut self, vertices: [Self::VertexId; 3]) -> Result<(), Self::Error>;
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    type VertexId = S::VertexId;
    type Error = S::Error;

    fn add_point(&mut self, position: Point3<f32>) -> Result<Self::VertexId, Self::Error> {
        (**self).add_point(position)
    }

    fn add_triangle(&mut self, vertices: [Self::VertexId; 3]) -> Result<(), Self::Error> {
        (**self).add_triangle(vertices)
    }
}
