use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A bindable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean, bound as `1` / `0` since Oracle has no boolean column type
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Raw bytes (BLOB)
    Bytes(Vec<u8>),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time
    Timestamp(NaiveDateTime),
    /// SQL expression inlined verbatim instead of bound (e.g. `sysdate`)
    Raw(String),
}

impl Value {
    /// Placeholder text for this value in compiled SQL.
    pub fn placeholder(&self) -> &str {
        match self {
            Value::Raw(sql) => sql,
            _ => "?",
        }
    }

    /// Whether the value is inlined rather than bound.
    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::Timestamp(ts) => write!(f, "'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Raw(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Type of an output bind (`RETURNING ... INTO`, procedure OUT params).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutKind {
    Integer,
    Float,
    Varchar,
    Blob,
    Clob,
    Cursor,
}

/// An output parameter binding: type plus maximum length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutBinding {
    /// Column or parameter the output belongs to
    pub name: String,
    pub kind: OutKind,
    /// Maximum length in bytes, `None` for LOB locators and cursors
    pub max_length: Option<usize>,
}

impl OutBinding {
    pub fn new(name: impl Into<String>, kind: OutKind, max_length: Option<usize>) -> Self {
        Self {
            name: name.into(),
            kind,
            max_length,
        }
    }

    /// Generated numeric key.
    pub fn key(name: impl Into<String>) -> Self {
        Self::new(name, OutKind::Integer, Some(38))
    }

    /// BLOB locator returned by an `EMPTY_BLOB()` insert or update.
    pub fn blob_locator(name: impl Into<String>) -> Self {
        Self::new(name, OutKind::Blob, None)
    }

    pub fn varchar(name: impl Into<String>, max_length: usize) -> Self {
        Self::new(name, OutKind::Varchar, Some(max_length))
    }
}
