//! SQLite value type conversions

use std::fmt;

use rusqlite::ffi;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use tracing::debug;

use crate::error::SqliteError;

/// SQLite value wrapper for type mapping
///
/// Every value SQLite can bind or return maps onto exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqliteValue {
    /// INTEGER type, 64-bit signed
    Integer(i64),
    /// REAL type for floating point
    Real(f64),
    /// TEXT type for UTF-8 strings
    Text(String),
    /// BLOB type for binary data
    Blob(Vec<u8>),
    /// NULL
    Null,
}

/// The five fundamental SQLite storage classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Real,
    Text,
    Blob,
    Null,
}

impl ValueKind {
    /// Classify a raw type code as reported by `sqlite3_value_type` / `sqlite3_column_type`.
    ///
    /// Decoding query results does not go through here: rusqlite hands cells over
    /// already classified as `ValueRef`. This is for callers holding raw codes.
    pub fn from_code(code: i32) -> Result<Self, SqliteError> {
        match code {
            ffi::SQLITE_INTEGER => Ok(ValueKind::Integer),
            ffi::SQLITE_FLOAT => Ok(ValueKind::Real),
            ffi::SQLITE_TEXT => Ok(ValueKind::Text),
            ffi::SQLITE_BLOB => Ok(ValueKind::Blob),
            ffi::SQLITE_NULL => Ok(ValueKind::Null),
            other => Err(SqliteError::UnsupportedValueType(other)),
        }
    }

    /// The raw SQLite type code for this kind
    pub fn code(&self) -> i32 {
        match self {
            ValueKind::Integer => ffi::SQLITE_INTEGER,
            ValueKind::Real => ffi::SQLITE_FLOAT,
            ValueKind::Text => ffi::SQLITE_TEXT,
            ValueKind::Blob => ffi::SQLITE_BLOB,
            ValueKind::Null => ffi::SQLITE_NULL,
        }
    }

    /// Get the SQLite type name, as returned by `typeof()`
    pub fn sqlite_type(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Blob => "blob",
            ValueKind::Null => "null",
        }
    }
}

impl SqliteValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SqliteValue::Integer(_) => ValueKind::Integer,
            SqliteValue::Real(_) => ValueKind::Real,
            SqliteValue::Text(_) => ValueKind::Text,
            SqliteValue::Blob(_) => ValueKind::Blob,
            SqliteValue::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, SqliteValue::Null) }

    /// Integer view of the value. Reals are truncated toward zero when they fit in an i64,
    /// text is parsed.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqliteValue::Integer(i) => Some(*i),
            SqliteValue::Real(f) => {
                // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
                if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(f.trunc() as i64)
                } else {
                    None
                }
            }
            SqliteValue::Text(s) => s.parse().ok(),
            SqliteValue::Blob(_) | SqliteValue::Null => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            SqliteValue::Integer(i) => Some(*i as f64),
            SqliteValue::Real(f) => Some(*f),
            SqliteValue::Text(s) => s.parse().ok(),
            SqliteValue::Blob(_) | SqliteValue::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            SqliteValue::Integer(i) => Some(i.to_string()),
            SqliteValue::Real(f) => Some(format!("{:?}", f)),
            SqliteValue::Text(s) => Some(s.clone()),
            SqliteValue::Blob(_) | SqliteValue::Null => None,
        }
    }

    /// Borrow the string when this is a TEXT value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqliteValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// SQLite has no boolean class; 1 and 0 (in any numeric spelling) are the only booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_integer() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for SqliteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqliteValue::Integer(i) => write!(f, "{}", i),
            SqliteValue::Real(r) => write!(f, "{:?}", r),
            SqliteValue::Text(s) => write!(f, "\"{}\"", s),
            SqliteValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
            SqliteValue::Null => write!(f, "null"),
        }
    }
}

/// Binding goes through the borrowed form, SQLite copies the bytes (SQLITE_TRANSIENT).
impl ToSql for SqliteValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            SqliteValue::Integer(i) => ValueRef::Integer(*i),
            SqliteValue::Real(f) => ValueRef::Real(*f),
            SqliteValue::Text(s) => ValueRef::Text(s.as_bytes()),
            SqliteValue::Blob(b) => ValueRef::Blob(b),
            SqliteValue::Null => ValueRef::Null,
        }))
    }
}

/// Copy a result cell out of the statement. The borrowed cell is only valid until the next step.
impl From<ValueRef<'_>> for SqliteValue {
    fn from(cell: ValueRef<'_>) -> Self {
        match cell {
            ValueRef::Null => SqliteValue::Null,
            ValueRef::Integer(i) => SqliteValue::Integer(i),
            ValueRef::Real(f) => SqliteValue::Real(f),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => SqliteValue::Text(s.to_owned()),
                Err(e) => {
                    debug!("TEXT cell is not valid UTF-8 ({}), keeping raw bytes", e);
                    SqliteValue::Blob(bytes.to_vec())
                }
            },
            ValueRef::Blob(bytes) => SqliteValue::Blob(bytes.to_vec()),
        }
    }
}

/// Convert rusqlite Value to our SqliteValue
impl From<rusqlite::types::Value> for SqliteValue {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => SqliteValue::Null,
            rusqlite::types::Value::Integer(i) => SqliteValue::Integer(i),
            rusqlite::types::Value::Real(f) => SqliteValue::Real(f),
            rusqlite::types::Value::Text(s) => SqliteValue::Text(s),
            rusqlite::types::Value::Blob(b) => SqliteValue::Blob(b),
        }
    }
}

impl From<SqliteValue> for rusqlite::types::Value {
    fn from(value: SqliteValue) -> Self {
        match value {
            SqliteValue::Integer(i) => rusqlite::types::Value::Integer(i),
            SqliteValue::Real(f) => rusqlite::types::Value::Real(f),
            SqliteValue::Text(s) => rusqlite::types::Value::Text(s),
            SqliteValue::Blob(b) => rusqlite::types::Value::Blob(b),
            SqliteValue::Null => rusqlite::types::Value::Null,
        }
    }
}

impl From<i64> for SqliteValue {
    fn from(value: i64) -> Self { SqliteValue::Integer(value) }
}

impl From<i32> for SqliteValue {
    fn from(value: i32) -> Self { SqliteValue::Integer(value as i64) }
}

impl From<bool> for SqliteValue {
    fn from(value: bool) -> Self { SqliteValue::Integer(if value { 1 } else { 0 }) }
}

impl From<f64> for SqliteValue {
    fn from(value: f64) -> Self { SqliteValue::Real(value) }
}

impl From<String> for SqliteValue {
    fn from(value: String) -> Self { SqliteValue::Text(value) }
}

impl From<&str> for SqliteValue {
    fn from(value: &str) -> Self { SqliteValue::Text(value.to_owned()) }
}

impl From<Vec<u8>> for SqliteValue {
    fn from(value: Vec<u8>) -> Self { SqliteValue::Blob(value) }
}

impl<T: Into<SqliteValue>> From<Option<T>> for SqliteValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqliteValue::Null,
        }
    }
}
