//! # Core Module
//!
//! Stateless building blocks of an extraction: the scalar grid, the constant
//! Marching Cubes case tables, the mesh sink contract and the readers that
//! turn files into grids or atom lists.
//!
//! - **Sampling** ([`grid`]) - Regular scalar lattices and their addressing
//! - **Case Tables** ([`tables`]) - Edge and triangulation tables for all 256 cases
//! - **Output** ([`mesh`]) - The [`mesh::sink::MeshSink`] trait and an in-memory mesh
//! - **Molecules** ([`models`]) - Atoms and van der Waals radii
//! - **File I/O** ([`io`]) - Byte volumes and atom lists

pub mod grid;
pub mod io;
pub mod mesh;
pub mod models;
pub mod tables;
