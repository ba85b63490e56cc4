//! Error types for SQLite storage engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("Failed to open database {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database connection is not open")]
    NotOpen,

    #[error("Database connection is already open")]
    AlreadyOpen,

    #[error("Schema bootstrap failed: {0}")]
    Schema(#[source] Box<SqliteError>),

    #[error("Failed to prepare statement `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to bind parameter {index}: {source}")]
    Bind {
        /// 1-based parameter index, 0 when the parameter count itself was wrong
        index: usize,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to execute statement: {0}")]
    Execution(#[source] rusqlite::Error),

    #[error("Failed to close database: {0}")]
    Close(#[source] rusqlite::Error),

    #[error("Unsupported SQLite value type code: {0}")]
    UnsupportedValueType(i32),

    #[error("Data directory error: {0}")]
    DataDirectory(String),

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl SqliteError {
    /// The SQLite extended error code carried by this error, if any
    pub fn sqlite_error_code(&self) -> Option<rusqlite::ErrorCode> {
        match self {
            SqliteError::Connection { source, .. }
            | SqliteError::Prepare { source, .. }
            | SqliteError::Bind { source, .. }
            | SqliteError::Execution(source)
            | SqliteError::Close(source) => source.sqlite_error_code(),
            SqliteError::Schema(inner) => inner.sqlite_error_code(),
            _ => None,
        }
    }

    /// True for UNIQUE / PRIMARY KEY / NOT NULL / CHECK violations
    pub fn is_constraint_violation(&self) -> bool { self.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) }
}
