use isomesh::core::grid::GridDimensions;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid dimensions '{0}'. Expected 'SXxSYxSZ' with positive integers (e.g., '64x64x32').")]
    InvalidDimensions(String),

    #[error("Invalid point '{0}'. Expected three comma-separated numbers (e.g., '0,-1.5,2').")]
    InvalidPoint(String),
}

/// Parses `SXxSYxSZ` into grid dimensions. Every component must be at least 1.
pub fn parse_dims(s: &str) -> Result<GridDimensions, ParseError> {
    let invalid = || ParseError::InvalidDimensions(s.to_string());
    let parts: Vec<usize> = s
        .split(['x', 'X'])
        .map(|p| p.trim().parse::<usize>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        &[sx, sy, sz] if sx > 0 && sy > 0 && sz > 0 => Ok(GridDimensions::new(sx, sy, sz)),
        _ => Err(invalid()),
    }
}

pub fn parse_point(s: &str) -> Result<Point3<f32>, ParseError> {
    let invalid = || ParseError::InvalidPoint(s.to_string());
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        &[x, y, z] if parts.iter().all(|c| c.is_finite()) => Ok(Point3::new(x, y, z)),
        _ => Err(invalid()),
    }
}
