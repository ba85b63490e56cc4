use std::marker::PhantomData;
use std::sync::Arc;

use skelestore_storage_sqlite::{Row, SqliteStorageEngine, SqliteValue};
use tracing::{debug, warn};

use crate::document::{decode_document, encode_document, Document};
use crate::error::DocumentError;

const INSERT: &str = r#"INSERT INTO "documents"("id", "body") VALUES (?1, json(?2))"#;
const UPSERT: &str = r#"INSERT INTO "documents"("id", "body") VALUES (?1, json(?2)) ON CONFLICT("id") DO UPDATE SET "body" = excluded."body""#;
const SELECT_BY_ID: &str = r#"SELECT "body" FROM "documents" WHERE json_extract("body", '$.id') = ?1 LIMIT 1"#;
const SELECT_ALL: &str = r#"SELECT "body" FROM "documents""#;
const UPDATE_BY_ID: &str = r#"UPDATE "documents" SET "body" = json(?1) WHERE json_extract("body", '$.id') = ?2"#;
const DELETE_BY_ID: &str = r#"DELETE FROM "documents" WHERE json_extract("body", '$.id') = ?1"#;
const COUNT: &str = r#"SELECT COUNT(*) FROM "documents""#;

/// CRUD over one document type
///
/// Holds nothing but a shared handle to the engine, so any number of adapters
/// (one per document type) can be created over the same store.
pub struct DocumentAdapter<D> {
    engine: Arc<SqliteStorageEngine>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> DocumentAdapter<D> {
    pub fn new(engine: Arc<SqliteStorageEngine>) -> Self { Self { engine, _document: PhantomData } }

    pub fn engine(&self) -> &Arc<SqliteStorageEngine> { &self.engine }

    /// Insert a new document. Fails with [`DocumentError::AlreadyExists`] if its id is taken.
    pub async fn save(&self, document: &D) -> Result<(), DocumentError> {
        let id = document.id();
        let body = encode_document(document)?;
        debug!("DocumentAdapter.save({})", id);
        match self.engine.execute(INSERT, vec![SqliteValue::Text(id.clone()), SqliteValue::Text(body)]).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_constraint_violation() => Err(DocumentError::AlreadyExists(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert the document, or replace the body of the one with the same id
    pub async fn upsert(&self, document: &D) -> Result<(), DocumentError> {
        let id = document.id();
        let body = encode_document(document)?;
        debug!("DocumentAdapter.upsert({})", id);
        self.engine.execute(UPSERT, vec![SqliteValue::Text(id), SqliteValue::Text(body)]).await?;
        Ok(())
    }

    pub async fn fetch(&self, id: &str) -> Result<Option<D>, DocumentError> {
        let rows = self.engine.query(SELECT_BY_ID, vec![SqliteValue::from(id)]).await?;
        match rows.into_iter().next() {
            Some(row) => decode_row(row).map(Some),
            None => Ok(None),
        }
    }

    /// Every stored document, in no particular order. Rows that no longer decode as `D` are skipped.
    pub async fn fetch_all(&self) -> Result<Vec<D>, DocumentError> {
        let rows = self.engine.query(SELECT_ALL, vec![]).await?;
        let total = rows.len();
        let documents: Vec<D> = rows
            .into_iter()
            .filter_map(|row| match decode_row(row) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!("Skipping undecodable document: {}", e);
                    None
                }
            })
            .collect();
        debug!("DocumentAdapter.fetch_all: {} of {} rows decoded", documents.len(), total);
        Ok(documents)
    }

    /// Replace the body of an existing document. Fails with [`DocumentError::NotFound`] if none has its id.
    pub async fn update(&self, document: &D) -> Result<(), DocumentError> {
        let id = document.id();
        let body = encode_document(document)?;
        let changed = self.engine.execute(UPDATE_BY_ID, vec![SqliteValue::Text(body), SqliteValue::Text(id.clone())]).await?;
        debug!("DocumentAdapter.update({}): {} rows", id, changed);
        if changed == 0 {
            return Err(DocumentError::NotFound(id));
        }
        Ok(())
    }

    /// Delete by id. Deleting an id that is not stored is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), DocumentError> {
        let changed = self.engine.execute(DELETE_BY_ID, vec![SqliteValue::from(id)]).await?;
        debug!("DocumentAdapter.delete({}): {} rows", id, changed);
        Ok(())
    }

    /// Number of stored rows, including any that would not decode as `D`
    pub async fn count(&self) -> Result<u64, DocumentError> {
        let rows = self.engine.query(COUNT, vec![]).await?;
        let count = rows.first().and_then(|row| row.first()).and_then(SqliteValue::as_integer).unwrap_or(0);
        Ok(count.max(0) as u64)
    }
}

impl<D> Clone for DocumentAdapter<D> {
    fn clone(&self) -> Self { Self { engine: self.engine.clone(), _document: PhantomData } }
}

fn decode_row<D: Document>(row: Row) -> Result<D, DocumentError> {
    match row.into_iter().next().unwrap_or(SqliteValue::Null) {
        SqliteValue::Text(body) => decode_document(&body),
        other => Err(DocumentError::InvalidBody(other.kind())),
    }
}
