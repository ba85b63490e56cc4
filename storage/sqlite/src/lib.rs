//! SQLite storage engine for SkeleStore
//!
//! Owns a single SQLite connection and exposes two statement primitives,
//! [`SqliteStorageEngine::execute`] and [`SqliteStorageEngine::query`], both
//! parameterized by SQL text and an ordered list of [`SqliteValue`]s.
//! Documents live in one table:
//!
//! ```sql
//! documents(id TEXT PRIMARY KEY, body TEXT NOT NULL,
//!           created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
//!           updated_at DATETIME DEFAULT CURRENT_TIMESTAMP)
//! ```
//!
//! with an expression index on `json_extract(body, '$.id')`. The bundled
//! SQLite shipped by `rusqlite` includes the JSON functions this relies on.
//!
//! # Example
//!
//! ```rust,ignore
//! use skelestore_storage_sqlite::{SqliteStorageEngine, SqliteValue};
//!
//! // Open a file-based database
//! let storage = SqliteStorageEngine::open_file("myapp.db").await?;
//!
//! // Or use an in-memory database for testing
//! let storage = SqliteStorageEngine::open_in_memory().await?;
//! let rows = storage.query("SELECT body FROM documents WHERE id = ?1", vec![SqliteValue::from("a")]).await?;
//! ```
//!
//! The engine is the only owner of the native connection. Neither the handle
//! nor its slot is reachable from outside this crate:
//!
//! ```compile_fail
//! use skelestore_storage_sqlite::SqliteConnection;
//! ```
//!
//! ```compile_fail
//! # async fn steal() {
//! let engine = skelestore_storage_sqlite::SqliteStorageEngine::new();
//! let _handle = engine.connection();
//! # }
//! ```

mod connection;
mod engine;
mod error;
pub mod schema;
mod value;

pub use connection::StorageMode;
pub use engine::{Row, SqliteStorageEngine};
pub use error::SqliteError;
pub use value::{SqliteValue, ValueKind};
