// Tapedeck Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapedeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Capture folder not found: {0}")]
    CaptureFolderMissing(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for TapedeckError {
    fn from(err: anyhow::Error) -> Self {
        TapedeckError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TapedeckError>;
