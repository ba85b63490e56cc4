//! SQLite storage engine implementation

use std::path::Path;

use rusqlite::{Connection, Statement};
use tracing::{debug, error, warn};

use crate::connection::{SqliteConnection, StorageMode};
use crate::error::SqliteError;
use crate::schema;
use crate::value::SqliteValue;

/// One result row, columns in statement order
pub type Row = Vec<SqliteValue>;

/// SQLite storage engine
///
/// Sole owner of the native connection. All statements go through the
/// connection's lock, one at a time.
pub struct SqliteStorageEngine {
    connection: SqliteConnection,
}

impl SqliteStorageEngine {
    /// Create an engine with no connection. Call [`open`](Self::open) before anything else.
    pub fn new() -> Self { Self { connection: SqliteConnection::new() } }

    /// Open and bootstrap a database in the given mode
    pub async fn with_mode(mode: StorageMode) -> Result<Self, SqliteError> {
        let engine = Self::new();
        engine.open(mode).await?;
        engine.bootstrap_schema().await?;
        Ok(engine)
    }

    /// Open and bootstrap a file-based SQLite database
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, SqliteError> { Self::with_mode(StorageMode::from(path.as_ref())).await }

    /// Open and bootstrap an in-memory SQLite database (for testing)
    pub async fn open_in_memory() -> Result<Self, SqliteError> { Self::with_mode(StorageMode::Memory).await }

    /// Establish the native connection
    pub async fn open(&self, mode: StorageMode) -> Result<(), SqliteError> { self.connection.open(mode).await }

    /// Create the documents table and its identifier index, and set the durability pragmas.
    ///
    /// Idempotent. On failure the connection is dropped: the engine reports
    /// [`SqliteError::NotOpen`] until it is opened again.
    pub async fn bootstrap_schema(&self) -> Result<(), SqliteError> {
        self.connection
            .with_slot(|slot| {
                let conn = slot.as_ref().ok_or(SqliteError::NotOpen)?;
                match bootstrap(conn) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        error!("Schema bootstrap failed, dropping connection: {}", e);
                        slot.take();
                        Err(SqliteError::Schema(Box::new(e)))
                    }
                }
            })
            .await
    }

    /// Run a statement that produces no rows (INSERT/UPDATE/DELETE/DDL/PRAGMA).
    ///
    /// Returns the number of rows changed by the statement (meaningful for DML only).
    ///
    /// `sql` is a single statement. Anything after the first statement is never
    /// prepared and never runs; the same holds for [`query`](Self::query).
    pub async fn execute(&self, sql: impl Into<String>, params: Vec<SqliteValue>) -> Result<usize, SqliteError> {
        let sql = sql.into();
        self.connection.with_connection(move |c| execute_statement(c, &sql, &params)).await
    }

    /// Run a row-producing statement and decode every column of every row
    pub async fn query(&self, sql: impl Into<String>, params: Vec<SqliteValue>) -> Result<Vec<Row>, SqliteError> {
        let sql = sql.into();
        self.connection.with_connection(move |c| query_statement(c, &sql, &params)).await
    }

    /// Release the native connection. A second close fails with [`SqliteError::NotOpen`].
    pub async fn close(&self) -> Result<(), SqliteError> { self.connection.close().await }

    pub async fn is_open(&self) -> bool { self.connection.is_open().await }

    /// Version of the linked SQLite library
    pub fn sqlite_version() -> &'static str { rusqlite::version() }
}

impl Default for SqliteStorageEngine {
    fn default() -> Self { Self::new() }
}

fn bootstrap(conn: &Connection) -> Result<(), SqliteError> {
    debug!("Creating {} table", schema::DOCUMENTS_TABLE);
    execute_statement(conn, schema::CREATE_DOCUMENTS_TABLE, &[])?;
    execute_statement(conn, schema::CREATE_ID_INDEX, &[])?;

    let journal = query_statement(conn, schema::PRAGMA_JOURNAL_MODE, &[])?;
    // In-memory databases stay in "memory" mode
    let mode = journal.first().and_then(|row| row.first()).and_then(SqliteValue::as_text);
    debug!("journal_mode: {}", mode.as_deref().unwrap_or("unknown"));

    for pragma in schema::PRAGMAS {
        execute_statement(conn, pragma, &[])?;
    }
    Ok(())
}

/// Prepares the first statement in `sql` only; the unparsed tail is discarded.
/// The returned statement is finalized when dropped, which happens at the end of
/// the calling helper on every path.
fn prepare<'c>(conn: &'c Connection, sql: &str) -> Result<Statement<'c>, SqliteError> {
    debug!("Preparing: {}", sql);
    conn.prepare(sql).map_err(|source| SqliteError::Prepare { sql: sql.to_owned(), source })
}

fn bind_parameters(stmt: &mut Statement<'_>, params: &[SqliteValue]) -> Result<(), SqliteError> {
    let expected = stmt.parameter_count();
    if params.len() != expected {
        return Err(SqliteError::Bind { index: 0, source: rusqlite::Error::InvalidParameterCount(params.len(), expected) });
    }
    for (i, param) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, param).map_err(|source| SqliteError::Bind { index: i + 1, source })?;
    }
    Ok(())
}

pub(crate) fn execute_statement(conn: &Connection, sql: &str, params: &[SqliteValue]) -> Result<usize, SqliteError> {
    let mut stmt = prepare(conn, sql)?;
    bind_parameters(&mut stmt, params)?;
    stmt.raw_execute().map_err(SqliteError::Execution)
}

pub(crate) fn query_statement(conn: &Connection, sql: &str, params: &[SqliteValue]) -> Result<Vec<Row>, SqliteError> {
    let mut stmt = prepare(conn, sql)?;
    bind_parameters(&mut stmt, params)?;

    let column_count = stmt.column_count();
    let mut rows = stmt.raw_query();
    let mut results = Vec::new();
    while let Some(row) = rows.next().map_err(SqliteError::Execution)? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value = match row.get_ref(index) {
                Ok(cell) => SqliteValue::from(cell),
                Err(e) => {
                    warn!("Unreadable cell in column {}, decoding as NULL: {}", index, e);
                    SqliteValue::Null
                }
            };
            values.push(value);
        }
        results.push(values);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let engine = SqliteStorageEngine::open_in_memory().await.unwrap();
        let rows = engine.query("SELECT COUNT(*) FROM documents", vec![]).await.unwrap();
        assert_eq!(rows, vec![vec![SqliteValue::Integer(0)]]);
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() -> Result<(), SqliteError> {
        let engine = SqliteStorageEngine::open_in_memory().await?;
        engine.bootstrap_schema().await?;
        engine.bootstrap_schema().await?;

        let rows = engine.query("SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'idx_document_id'", vec![]).await?;
        assert_eq!(rows.len(), 1);

        let rows = engine.query("PRAGMA foreign_keys", vec![]).await?;
        assert_eq!(rows[0][0].as_bool(), Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn test_id_lookup_uses_index() -> Result<(), SqliteError> {
        let engine = SqliteStorageEngine::open_in_memory().await?;
        let plan = engine
            .query("EXPLAIN QUERY PLAN SELECT body FROM documents WHERE json_extract(body, '$.id') = ?1", vec!["a".into()])
            .await?;
        let detail: Vec<String> = plan.iter().filter_map(|row| row.last().and_then(SqliteValue::as_text)).collect();
        assert!(detail.iter().any(|d| d.contains("idx_document_id")), "plan should use the id index: {:?}", detail);
        Ok(())
    }

    #[test]
    fn test_sqlite_version() {
        // JSON functions ship with the bundled library
        assert!(SqliteStorageEngine::sqlite_version().starts_with('3'));
    }
}
