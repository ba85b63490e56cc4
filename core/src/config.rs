use std::path::PathBuf;

use skelestore_storage_sqlite::{SqliteError, StorageMode};

/// Environment variable naming the database: `:memory:` or a file path
pub const DATABASE_ENV: &str = "SKELESTORE_DATABASE";

/// How a [`Store`](crate::Store) opens its engine
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub mode: StorageMode,
}

impl StoreConfig {
    pub fn memory() -> Self { Self { mode: StorageMode::Memory } }

    pub fn file(path: impl Into<PathBuf>) -> Self { Self { mode: StorageMode::file(path) } }

    /// A database file under the platform data directory, see [`StorageMode::in_data_dir`]
    pub fn in_data_dir(folder_name: &str, file_name: &str) -> Result<Self, SqliteError> {
        Ok(Self { mode: StorageMode::in_data_dir(folder_name, file_name)? })
    }

    /// Read [`DATABASE_ENV`], falling back to an in-memory database when unset
    pub fn from_env() -> Self {
        match std::env::var(DATABASE_ENV) {
            Ok(target) => Self { mode: StorageMode::parse(&target) },
            Err(_) => Self::memory(),
        }
    }
}
