use predef_core::StableId;
use thiserror::Error;

/// Fatal resolution failures. The first one aborts the whole pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Unexpected representation: {0}")]
    UnexpectedRepresentation(String),

    #[error("Missing declaration for symbol '{0}'")]
    MissingDeclaration(String),

    #[error("Record {0} was reserved but never completed")]
    IncompleteRecord(StableId),
}
