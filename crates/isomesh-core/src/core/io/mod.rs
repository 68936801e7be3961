//! Readers for the inputs an extraction can start from.
//!
//! [`volume`] loads byte-packed scalar volumes into a [`ScalarGrid`], and
//! [`atoms`] loads atom lists used to build molecular surface grids.
//!
//! [`ScalarGrid`]: crate::core::grid::ScalarGrid

pub mod atoms;
pub mod volume;
