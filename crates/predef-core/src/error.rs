use crate::types::StableId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reference to {0} has no record in the bundle")]
    DanglingReference(StableId),

    #[error("Duplicate record for {0}")]
    DuplicateRecord(StableId),
}
