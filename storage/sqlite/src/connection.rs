//! The single serialized SQLite connection

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SqliteError;

/// Where the database lives
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// In-memory database. Not persisted; lives as long as the connection.
    #[default]
    Memory,
    /// File-based database, persisted between runs
    File(PathBuf),
}

impl StorageMode {
    pub fn file(path: impl Into<PathBuf>) -> Self { StorageMode::File(path.into()) }

    /// A database file inside `folder_name` under the platform data directory
    /// (e.g. `~/.local/share` on Linux). The folder is created if missing.
    pub fn in_data_dir(folder_name: &str, file_name: &str) -> Result<Self, SqliteError> {
        let dir = dirs::data_dir()
            .ok_or_else(|| SqliteError::DataDirectory("Failed to locate platform data directory".to_owned()))?
            .join(folder_name);
        std::fs::create_dir_all(&dir).map_err(|e| SqliteError::DataDirectory(format!("{}: {}", dir.display(), e)))?;
        Ok(StorageMode::File(dir.join(file_name)))
    }

    /// Parse the `:memory:` marker or a file path
    pub fn parse(target: &str) -> Self {
        match target.trim() {
            "" | ":memory:" => StorageMode::Memory,
            path => StorageMode::File(PathBuf::from(path)),
        }
    }

    fn connect(&self) -> Result<Connection, SqliteError> {
        match self {
            StorageMode::File(path) => {
                Connection::open(path).map_err(|source| SqliteError::Connection { target: path.display().to_string(), source })
            }
            StorageMode::Memory => {
                Connection::open_in_memory().map_err(|source| SqliteError::Connection { target: ":memory:".to_owned(), source })
            }
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Memory => write!(f, ":memory:"),
            StorageMode::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&Path> for StorageMode {
    fn from(path: &Path) -> Self { StorageMode::File(path.to_path_buf()) }
}

/// Owner of the one native connection handle
///
/// rusqlite::Connection is Send but not Sync, so it lives behind a Mutex and every
/// operation runs on the blocking pool while holding the lock. That lock is the
/// single serialization point: statements never interleave on the connection.
/// `None` means not opened yet, or already closed. Only the engine holds one,
/// and the native handle never leaves the slot except to be closed.
pub(crate) struct SqliteConnection {
    inner: Arc<Mutex<Option<Connection>>>,
}

impl SqliteConnection {
    pub fn new() -> Self { Self { inner: Arc::new(Mutex::new(None)) } }

    /// Establish the native connection
    pub async fn open(&self, mode: StorageMode) -> Result<(), SqliteError> {
        self.with_slot(move |slot| {
            if slot.is_some() {
                return Err(SqliteError::AlreadyOpen);
            }
            debug!("Opening SQLite database at {}", mode);
            *slot = Some(mode.connect()?);
            Ok(())
        })
        .await
    }

    /// Execute a function with the connection
    ///
    /// This acquires the mutex lock and runs the provided closure with the connection.
    /// The closure is executed within spawn_blocking since rusqlite operations are synchronous.
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T, SqliteError>
    where
        F: FnOnce(&Connection) -> Result<T, SqliteError> + Send + 'static,
        T: Send + 'static,
    {
        self.with_slot(move |slot| match slot.as_ref() {
            Some(conn) => f(conn),
            None => Err(SqliteError::NotOpen),
        })
        .await
    }

    /// Execute a function with the connection slot itself, for opening and closing
    pub(crate) async fn with_slot<F, T>(&self, f: F) -> Result<T, SqliteError>
    where
        F: FnOnce(&mut Option<Connection>) -> Result<T, SqliteError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| SqliteError::TaskJoin(e.to_string()))?
    }

    /// Release the native connection. The slot is emptied before closing, so a
    /// failed close still leaves no stale handle behind.
    pub async fn close(&self) -> Result<(), SqliteError> {
        self.with_slot(|slot| {
            let conn = slot.take().ok_or(SqliteError::NotOpen)?;
            debug!("Closing SQLite database");
            // On failure rusqlite hands the connection back; dropping it finalizes what it can.
            conn.close().map_err(|(_conn, e)| SqliteError::Close(e))
        })
        .await
    }

    pub async fn is_open(&self) -> bool { self.inner.lock().await.is_some() }
}

impl Default for SqliteConnection {
    fn default() -> Self { Self::new() }
}
