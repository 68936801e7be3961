use super::config::ConfigError;
use crate::core::grid::GridError;
use crate::core::io::atoms::AtomFileError;
use crate::core::io::volume::VolumeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid grid: {source}")]
    Grid {
        #[from]
        source: GridError,
    },

    #[error("Failed to load volume: {source}")]
    Volume {
        #[from]
        source: VolumeError,
    },

    #[error("Failed to load atoms: {source}")]
    AtomFile {
        #[from]
        source: AtomFileError,
    },

    #[error("Cannot build a surface from an empty atom set")]
    EmptyAtomSet,

    #[error("Surface grid of {samples} samples exceeds the limit of {limit}")]
    GridTooLarge { samples: usize, limit: usize },
}

/// Failure of an extraction that writes into a caller-supplied sink.
#[derive(Debug, Error)]
pub enum ExtractionError<E> {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Mesh sink rejected the extraction: {0}")]
    Sink(E),
}
