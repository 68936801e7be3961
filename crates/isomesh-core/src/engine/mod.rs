//! # Engine Module
//!
//! The stateful half of an extraction: classifying cells, resolving shared
//! edge vertices and driving the scan over the grid.
//!
//! ## Architecture
//!
//! - **Cell Classification** ([`classifier`]) - Corner tests, case indices and the edge lattice
//! - **Vertex Sharing** ([`cache`], [`resolver`]) - One vertex per crossed lattice edge
//! - **Extraction** ([`marching_cubes`]) - The cell scan that feeds a mesh sink
//! - **Molecular Surfaces** ([`surface_field`]) - Sampling atom spheres onto a grid
//! - **Configuration** ([`config`]) - Validated parameter sets and their builders
//! - **Progress Monitoring** ([`progress`]) - Phase and task callbacks for frontends
//! - **Error Handling** ([`error`]) - Engine and extraction failures

pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod marching_cubes;
pub mod progress;
pub mod resolver;
pub mod surface_field;
