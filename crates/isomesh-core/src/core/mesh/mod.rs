//! Output side of the extraction: the sink contract and an in-memory mesh.

pub mod sink;
pub mod triangle_mesh;
