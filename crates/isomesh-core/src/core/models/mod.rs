pub mod atom;
pub mod elements;
