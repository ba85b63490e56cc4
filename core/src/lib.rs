//! # SkeleStore core
//!
//! Typed document storage over a single SQLite table. A record type implements
//! [`Document`] (serde serialization plus a string identifier) and gets CRUD
//! through a [`DocumentAdapter`]:
//!
//! ```rust,ignore
//! let store = Store::open(StoreConfig::memory()).await?;
//! let todos = store.adapter::<Todo>();
//!
//! todos.save(&Todo { id: "a".into(), name: "x".into() }).await?;
//! assert!(todos.fetch("a").await?.is_some());
//! todos.delete("a").await?;
//! ```

pub mod adapter;
pub mod config;
pub mod document;
pub mod error;
pub mod store;

pub use adapter::DocumentAdapter;
pub use config::StoreConfig;
pub use document::{decode_document, encode_document, Document};
pub use error::DocumentError;
pub use store::Store;

pub use skelestore_storage_sqlite as storage;
