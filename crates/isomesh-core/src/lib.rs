//! # isomesh
//!
//! Marching Cubes isosurface extraction over regular scalar grids, with a
//! molecular surface sampler for atom sets.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Scalar grids, the 256-case edge and
//!   triangulation tables, the [`MeshSink`](core::mesh::sink::MeshSink) output
//!   contract, atoms and file readers.
//!
//! - **[`engine`]: The Logic Core.** Cell classification, shared edge vertex
//!   resolution, the cell scan itself and the molecular surface sampler,
//!   together with configuration, progress and error types.
//!
//! - **[`workflows`]: The Public API.** Complete extractions from a grid, a
//!   byte volume or a list of atoms.
//!
//! Vertices are emitted once per crossed lattice edge and triangles reference
//! them by the ids the sink hands out. No normals are computed and no winding
//! order is guaranteed.

pub mod core;
pub mod engine;
pub mod workflows;
