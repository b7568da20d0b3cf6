use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{context} references unknown type {id}")]
    DanglingType { context: String, id: u64 },

    #[error("{context} references unknown symbol {id}")]
    DanglingSymbol { context: String, id: u64 },

    #[error("{context} references unknown signature {id}")]
    DanglingSignature { context: String, id: u64 },

    #[error("Type {0} is defined more than once")]
    DuplicateType(u64),

    #[error("Symbol {0} is defined more than once")]
    DuplicateSymbol(u64),

    #[error("Signature {0} is defined more than once")]
    DuplicateSignature(u64),

    #[error("Snapshot has no global symbol")]
    MissingGlobal,
}
