use isomesh::core::mesh::triangle_mesh::MeshError;
use isomesh::engine::error::{EngineError, ExtractionError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ExtractionError<MeshError>> for CliError {
    fn from(e: ExtractionError<MeshError>) -> Self {
        match e {
            ExtractionError::Engine(engine) => CliError::Engine(engine),
            ExtractionError::Sink(mesh) => CliError::Mesh(mesh),
        }
    }
}
