use skelestore_storage_sqlite::{SqliteError, ValueKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Storage error: {0}")]
    Storage(#[from] SqliteError),
    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Document id {expected:?} does not match the serialized `id` field ({found})")]
    IdentifierMismatch { expected: String, found: String },
    #[error("Failed to decode document: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Document body is {0:?}, expected text")]
    InvalidBody(ValueKind),
    #[error("Document {0:?} already exists")]
    AlreadyExists(String),
    #[error("Document {0:?} not found")]
    NotFound(String),
}
