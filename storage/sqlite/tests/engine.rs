//! SQLite Storage Engine Integration Tests
//!
//! These tests exercise the statement lifecycle against a real SQLite instance:
//! - Open / bootstrap / close ordering
//! - Prepare, bind and execution failures and their classification
//! - Statements being released on every path
//! - Value round trips through bound parameters
//! - Serialized access from concurrent tasks

mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{insert_raw, row_count};
use skelestore_storage_sqlite::{SqliteError, SqliteStorageEngine, SqliteValue, StorageMode};

#[tokio::test]
async fn test_operations_before_open_fail() {
    let engine = SqliteStorageEngine::new();
    assert!(!engine.is_open().await);
    assert!(matches!(engine.execute("SELECT 1", vec![]).await, Err(SqliteError::NotOpen)));
    assert!(matches!(engine.query("SELECT 1", vec![]).await, Err(SqliteError::NotOpen)));
    assert!(matches!(engine.bootstrap_schema().await, Err(SqliteError::NotOpen)));
    assert!(matches!(engine.close().await, Err(SqliteError::NotOpen)));
}

#[tokio::test]
async fn test_explicit_lifecycle() -> Result<()> {
    let engine = SqliteStorageEngine::new();
    engine.open(StorageMode::Memory).await?;
    engine.bootstrap_schema().await?;
    insert_raw(&engine, "a", r#"{"id": "a"}"#).await?;
    assert_eq!(row_count(&engine).await?, 1);

    engine.close().await?;
    assert!(matches!(engine.query("SELECT 1", vec![]).await, Err(SqliteError::NotOpen)));
    assert!(matches!(engine.close().await, Err(SqliteError::NotOpen)));

    // Reopening gives a fresh in-memory database
    engine.open(StorageMode::Memory).await?;
    engine.bootstrap_schema().await?;
    assert_eq!(row_count(&engine).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_open_twice_fails() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    assert!(matches!(engine.open(StorageMode::Memory).await, Err(SqliteError::AlreadyOpen)));
    // The first connection is untouched
    assert_eq!(row_count(&engine).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_error_phases_are_distinguished() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;

    let err = engine.execute("INSERT INTO nowhere VALUES (1)", vec![]).await.unwrap_err();
    assert!(matches!(err, SqliteError::Prepare { .. }), "got {:?}", err);
    assert!(err.to_string().contains("no such table"), "diagnostic should come from SQLite: {}", err);

    let err = engine.execute("INSERT INTO documents (id, body) VALUES (?1, ?2)", vec!["only-one".into()]).await.unwrap_err();
    assert!(matches!(err, SqliteError::Bind { index: 0, .. }), "got {:?}", err);

    let err = engine.execute("INSERT INTO documents (id, body) VALUES (?1, ?2)", vec!["a".into(), SqliteValue::Null]).await.unwrap_err();
    assert!(matches!(err, SqliteError::Execution(_)), "got {:?}", err);
    assert!(err.is_constraint_violation());

    let err = engine.execute("SELECT 1", vec![]).await.unwrap_err();
    assert!(matches!(err, SqliteError::Execution(_)), "row-producing statements are not executable: {:?}", err);

    // None of the failures changed anything
    assert_eq!(row_count(&engine).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_statements_released_after_failures() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    let _ = engine.execute("INSERT INTO documents (id, body) VALUES (?1, ?2)", vec!["a".into()]).await;
    let _ = engine.execute("INSERT INTO documents (id, body) VALUES (?1, NULL)", vec!["a".into()]).await;
    let _ = engine.query("SELECT json(?1)", vec!["{broken".into()]).await;
    let _ = engine.query("SELECT * FROM documents", vec![]).await?;

    // sqlite3_close reports SQLITE_BUSY if any statement was left unfinalized
    engine.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_execute_reports_changes() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    insert_raw(&engine, "a", r#"{"id": "a", "n": 1}"#).await?;
    insert_raw(&engine, "b", r#"{"id": "b", "n": 2}"#).await?;

    let changed = engine.execute("UPDATE documents SET body = json(?1) WHERE id = ?2", vec![r#"{"id":"a","n":3}"#.into(), "a".into()]).await?;
    assert_eq!(changed, 1);
    let changed = engine.execute("DELETE FROM documents WHERE id = ?1", vec!["missing".into()]).await?;
    assert_eq!(changed, 0);
    let changed = engine.execute("DELETE FROM documents", vec![]).await?;
    assert_eq!(changed, 2);
    Ok(())
}

#[tokio::test]
async fn test_only_first_statement_runs() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    let changed = engine
        .execute(r#"INSERT INTO documents (id, body) VALUES ('a', '{"id":"a"}'); INSERT INTO documents (id, body) VALUES ('b', '{"id":"b"}')"#, vec![])
        .await?;
    assert_eq!(changed, 1);
    let rows = engine.query("SELECT id FROM documents; DELETE FROM documents", vec![]).await?;
    assert_eq!(rows, vec![vec![SqliteValue::from("a")]]);
    assert_eq!(row_count(&engine).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_value_round_trip_through_parameters() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    let values = vec![
        SqliteValue::Integer(i64::MAX),
        SqliteValue::Integer(-1),
        SqliteValue::Real(std::f64::consts::PI),
        SqliteValue::Real(-0.0),
        SqliteValue::Text(String::new()),
        SqliteValue::Text("naïve ☃ text".into()),
        SqliteValue::Blob(vec![0, 159, 146, 150]),
        SqliteValue::Null,
    ];
    for value in values {
        let rows = engine.query("SELECT ?1, typeof(?1)", vec![value.clone()]).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], value);
        assert_eq!(rows[0][1], SqliteValue::Text(value.kind().sqlite_type().to_owned()));
    }
    Ok(())
}

#[tokio::test]
async fn test_query_rows_and_columns_in_order() -> Result<()> {
    let engine = SqliteStorageEngine::open_in_memory().await?;
    for id in ["c", "a", "b"] {
        insert_raw(&engine, id, &format!(r#"{{"id": "{}"}}"#, id)).await?;
    }
    let rows = engine.query("SELECT id, json_extract(body, '$.id'), NULL FROM documents ORDER BY id", vec![]).await?;
    let ids: Vec<_> = rows.iter().map(|row| row[0].clone()).collect();
    assert_eq!(ids, vec![SqliteValue::from("a"), SqliteValue::from("b"), SqliteValue::from("c")]);
    for row in &rows {
        assert_eq!(row.len(), 3);
        assert_eq!(row[0], row[1]);
        assert!(row[2].is_null());
    }

    assert!(engine.query("SELECT * FROM documents WHERE id = ?1", vec!["zzz".into()]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_schema_failure_leaves_engine_closed() -> Result<()> {
    let engine = SqliteStorageEngine::new();
    engine.open(StorageMode::Memory).await?;
    // A view squatting on the table name makes the index creation fail
    engine.execute("CREATE VIEW documents AS SELECT 'x' AS id, '{}' AS body", vec![]).await?;

    let err = engine.bootstrap_schema().await.unwrap_err();
    assert!(matches!(err, SqliteError::Schema(_)), "got {:?}", err);
    assert!(!engine.is_open().await);
    assert!(matches!(engine.query("SELECT 1", vec![]).await, Err(SqliteError::NotOpen)));
    Ok(())
}

#[tokio::test]
async fn test_file_database_persists() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.db");

    let engine = SqliteStorageEngine::open_file(&path).await?;
    insert_raw(&engine, "kept", r#"{"id": "kept"}"#).await?;
    let journal = engine.query("PRAGMA journal_mode", vec![]).await?;
    assert_eq!(journal[0][0], SqliteValue::Text("wal".into()));
    engine.close().await?;

    let engine = SqliteStorageEngine::open_file(&path).await?;
    let rows = engine.query("SELECT id FROM documents", vec![]).await?;
    assert_eq!(rows, vec![vec![SqliteValue::from("kept")]]);
    engine.close().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_are_serialized() -> Result<()> {
    let engine = Arc::new(SqliteStorageEngine::open_in_memory().await?);

    let mut handles = Vec::new();
    for task in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let id = format!("{}-{}", task, i);
                insert_raw(&engine, &id, &format!(r#"{{"id": "{}", "task": {}}}"#, id, task)).await?;
            }
            anyhow::Ok(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(row_count(&engine).await?, 200);
    let rows = engine.query("SELECT COUNT(*) FROM documents WHERE json_extract(body, '$.id') = id", vec![]).await?;
    assert_eq!(rows[0][0], SqliteValue::Integer(200));
    Ok(())
}
