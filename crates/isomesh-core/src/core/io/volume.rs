use crate::core::grid::{GridDimensions, GridError, ScalarGrid};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Volume data is incomplete: expected {expected} bytes, found {actual}")]
    IncompleteInput { expected: usize, actual: usize },
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),
}

/// Raw volume with one unsigned byte per voxel.
///
/// Bytes are stored in the grid's flat order: `sz` bytes per row, `sy` rows
/// per slab and `sx` slabs. The resulting grid is centred on the origin.
pub struct VolumeFile;

impl VolumeFile {
    /// Reads exactly `dims.sample_count()` bytes; trailing data is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::IncompleteInput`] if the reader ends early, in which
    /// case no grid is produced.
    pub fn read_from(
        reader: &mut impl Read,
        dims: GridDimensions,
        voxel_size: f32,
    ) -> Result<ScalarGrid, VolumeError> {
        let expected = dims.sample_count();
        let mut bytes = Vec::with_capacity(expected);
        reader.take(expected as u64).read_to_end(&mut bytes)?;
        if bytes.len() != expected {
            return Err(VolumeError::IncompleteInput {
                expected,
                actual: bytes.len(),
            });
        }
        debug!(bytes = expected, "Read volume data.");

        let samples = bytes.into_iter().map(f32::from).collect();
        let offset = ScalarGrid::centered_offset(dims, voxel_size);
        Ok(ScalarGrid::new(dims, samples, voxel_size, offset)?)
    }

    pub fn read_from_path<P: AsRef<Path>>(
        path: P,
        dims: GridDimensions,
        voxel_size: f32,
    ) -> Result<ScalarGrid, VolumeError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, dims, voxel_size)
    }
}
