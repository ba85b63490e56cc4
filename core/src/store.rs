use std::sync::Arc;

use skelestore_storage_sqlite::{SqliteError, SqliteStorageEngine};
use tokio::sync::OnceCell;
use tracing::info;

use crate::adapter::DocumentAdapter;
use crate::config::StoreConfig;
use crate::document::Document;

static SHARED: OnceCell<Store> = OnceCell::const_new();

/// Handle to one opened and bootstrapped engine
///
/// Cloning is cheap; every clone and every adapter handed out shares the same
/// engine, and therefore the same connection.
#[derive(Clone)]
pub struct Store {
    engine: Arc<SqliteStorageEngine>,
}

impl Store {
    /// Open the engine in the configured mode and bootstrap its schema
    pub async fn open(config: StoreConfig) -> Result<Self, SqliteError> {
        info!("Opening store at {}", config.mode);
        let engine = SqliteStorageEngine::with_mode(config.mode).await?;
        Ok(Self { engine: Arc::new(engine) })
    }

    /// Wrap an engine the caller has already opened and bootstrapped
    pub fn from_engine(engine: Arc<SqliteStorageEngine>) -> Self { Self { engine } }

    pub fn engine(&self) -> &Arc<SqliteStorageEngine> { &self.engine }

    pub fn adapter<D: Document>(&self) -> DocumentAdapter<D> { DocumentAdapter::new(self.engine.clone()) }

    /// Close the engine shared by this store, its clones, and its adapters.
    ///
    /// Closing the shared store is terminal: [`Store::shared`] and
    /// [`Store::init_shared`] keep returning it, and every operation on it
    /// fails with [`SqliteError::NotOpen`] for the rest of the process.
    pub async fn close(&self) -> Result<(), SqliteError> { self.engine.close().await }

    /// The process-wide store, opened with `config` on first use.
    ///
    /// Initialization runs at most once, even when called concurrently; later
    /// calls return the existing store and ignore `config`. A failed
    /// initialization leaves the slot empty so the next call tries again.
    pub async fn init_shared(config: StoreConfig) -> Result<&'static Store, SqliteError> {
        SHARED.get_or_try_init(|| Store::open(config)).await
    }

    /// The process-wide store, if [`Store::init_shared`] has completed
    pub fn shared() -> Option<&'static Store> { SHARED.get() }
}
