//! A small todo list persisted with SkeleStore
//!
//! ```bash
//! SKELESTORE_DATABASE=/tmp/todos.db cargo run -p skelestore --example todo_list
//! ```

use serde::{Deserialize, Serialize};
use skelestore::{Document, Store, StoreConfig};
use tracing::info;
use uuid::Uuid;

#[derive(Document, Debug, Clone, Serialize, Deserialize)]
struct TodoListModel {
    id: Uuid,
    name: String,
    done: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let store = Store::init_shared(StoreConfig::from_env()).await?;
    let todos = store.adapter::<TodoListModel>();

    for name in ["buy milk", "walk dog", "write report"] {
        todos.save(&TodoListModel { id: Uuid::new_v4(), name: name.to_owned(), done: false }).await?;
    }

    let mut all = todos.fetch_all().await?;
    if let Some(first) = all.first_mut() {
        first.done = true;
        todos.update(first).await?;
    }

    for todo in todos.fetch_all().await? {
        info!("[{}] {} ({})", if todo.done { "x" } else { " " }, todo.name, todo.id);
    }

    let finished: Vec<_> = todos.fetch_all().await?.into_iter().filter(|t| t.done).collect();
    for todo in finished {
        todos.delete(&todo.id()).await?;
    }
    info!("{} todos left", todos.count().await?);

    store.close().await?;
    Ok(())
}
