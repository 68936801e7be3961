//! # Workflows Module
//!
//! End-to-end entry points that load input, report progress phases and run
//! an extraction into a caller-supplied [`MeshSink`](crate::core::mesh::sink::MeshSink).
//!
//! - **Extraction** ([`extract`]) - In-memory grids and packed byte volumes
//! - **Molecular Surfaces** ([`surface`]) - Atom lists and atom CSV files

pub mod extract;
pub mod surface;
