//! # SkeleStore
//!
//! Local persistence for typed records without per-type schema or SQL. Every
//! record is serialized to JSON and stored whole in one SQLite table; lookups
//! by identifier go through an expression index on `json_extract(body, '$.id')`.
//!
//! ## Core Concepts
//!
//! - **Document**: a serde-serializable record with a string `id`
//! - **DocumentAdapter**: typed save / fetch / fetch_all / update / delete for one document type
//! - **Store**: the one opened engine, shared by every adapter
//! - **SqliteStorageEngine**: sole owner of the SQLite connection; runs statements one at a time
//!
//! ## Example
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use skelestore::{Document, Store, StoreConfig};
//!
//! #[derive(Document, Serialize, Deserialize, Debug, PartialEq)]
//! struct Todo {
//!     id: String,
//!     name: String,
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::open(StoreConfig::memory()).await?;
//! let todos = store.adapter::<Todo>();
//!
//! todos.save(&Todo { id: "a".into(), name: "x".into() }).await?;
//! assert_eq!(todos.fetch("a").await?.map(|t| t.name), Some("x".to_string()));
//! assert_eq!(todos.fetch_all().await?.len(), 1);
//! todos.delete("a").await?;
//! # Ok(())
//! # }
//! ```

pub use skelestore_core as core;
#[cfg(feature = "derive")]
pub use skelestore_derive as derive;
pub use skelestore_storage_sqlite as storage;

// Re-export commonly used types
pub use skelestore_core::{decode_document, encode_document, Document, DocumentAdapter, DocumentError, Store, StoreConfig};
pub use skelestore_storage_sqlite::{SqliteError, SqliteStorageEngine, SqliteValue, StorageMode};

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use skelestore_derive::*;

// Re-export dependencies needed by derive macros
#[doc(hidden)]
pub mod derive_deps {
    pub use ::serde;
}
