use std::str::FromStr;

use skelestore_storage_sqlite::{SqliteStorageEngine, SqliteValue};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// Insert a raw document row, bypassing any typed layer
#[allow(unused)]
pub async fn insert_raw(engine: &SqliteStorageEngine, id: &str, body: &str) -> anyhow::Result<()> {
    engine
        .execute("INSERT INTO documents (id, body) VALUES (?1, json(?2))", vec![SqliteValue::from(id), SqliteValue::from(body)])
        .await?;
    Ok(())
}

#[allow(unused)]
pub async fn row_count(engine: &SqliteStorageEngine) -> anyhow::Result<i64> {
    let rows = engine.query("SELECT COUNT(*) FROM documents", vec![]).await?;
    rows.first().and_then(|row| row.first()).and_then(SqliteValue::as_integer).ok_or_else(|| anyhow::anyhow!("COUNT(*) returned no value"))
}
