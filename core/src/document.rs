//! The capability a record type needs to be stored as a document

use serde::{de::DeserializeOwned, Serialize};

use crate::error::DocumentError;

/// Name of the top-level body field the identifier is stored under
pub const ID_FIELD: &str = "id";

/// A record that can be stored whole as a JSON document.
///
/// The serialized form must be a JSON object whose `id` field is a string
/// equal to [`Document::id`]; [`encode_document`] rejects anything else, which
/// keeps the `id` column and the body identifier in agreement.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Todo { id: String, name: String }
///
/// impl Document for Todo {
///     fn id(&self) -> String { self.id.clone() }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> String;
}

/// Serialize a document to its stored JSON text
pub fn encode_document<D: Document>(document: &D) -> Result<String, DocumentError> {
    let value = serde_json::to_value(document).map_err(DocumentError::Encode)?;
    let id = document.id();
    match value.get(ID_FIELD) {
        Some(serde_json::Value::String(found)) if *found == id => {}
        other => {
            let found = other.map(|v| v.to_string()).unwrap_or_else(|| "missing".to_owned());
            return Err(DocumentError::IdentifierMismatch { expected: id, found });
        }
    }
    serde_json::to_string(&value).map_err(DocumentError::Encode)
}

pub fn decode_document<D: Document>(body: &str) -> Result<D, DocumentError> { serde_json::from_str(body).map_err(DocumentError::Decode) }
