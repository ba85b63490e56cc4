use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skelestore_core::Document;
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub name: String,
}

impl Todo {
    #[allow(unused)]
    pub fn new(id: &str, name: &str) -> Self { Self { id: id.to_owned(), name: name.to_owned() } }
}

impl Document for Todo {
    fn id(&self) -> String { self.id.clone() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: u16,
    pub tracks: Vec<String>,
    pub rating: Option<f64>,
}

impl Document for Album {
    fn id(&self) -> String { self.id.clone() }
}

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
