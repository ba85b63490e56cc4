//! Basic SQLite storage example

use skelestore_storage_sqlite::{SqliteStorageEngine, SqliteValue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let storage = SqliteStorageEngine::open_in_memory().await?;

    storage
        .execute(
            "INSERT INTO documents (id, body) VALUES (?1, json(?2))",
            vec![SqliteValue::from("greeting"), SqliteValue::from(r#"{"id": "greeting", "text": "hello"}"#)],
        )
        .await?;

    for row in storage.query("SELECT id, body, created_at FROM documents", vec![]).await? {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }

    storage.close().await?;
    Ok(())
}
