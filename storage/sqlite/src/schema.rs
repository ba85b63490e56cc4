//! DDL and pragmas for the documents table

/// Name of the single table holding every document
pub const DOCUMENTS_TABLE: &str = "documents";

pub const CREATE_DOCUMENTS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS "documents"(
    "id" TEXT PRIMARY KEY,
    "body" TEXT NOT NULL,
    "created_at" DATETIME DEFAULT CURRENT_TIMESTAMP,
    "updated_at" DATETIME DEFAULT CURRENT_TIMESTAMP
)"#;

/// Expression index matching the `json_extract(body, '$.id')` predicates used for lookups
pub const CREATE_ID_INDEX: &str = r#"CREATE INDEX IF NOT EXISTS "idx_document_id" ON "documents"(json_extract("body", '$.id'))"#;

/// `journal_mode` reports the resulting mode as a row, so it is issued as a query
pub const PRAGMA_JOURNAL_MODE: &str = "PRAGMA journal_mode = WAL";

pub const PRAGMAS: &[&str] = &["PRAGMA synchronous = NORMAL", "PRAGMA foreign_keys = ON"];
