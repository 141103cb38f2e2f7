use crate::ast::{Join, Predicate, Value};
use serde::{Deserialize, Serialize};

/// Ordered column/value pairs of one inserted row.
pub type Row = Vec<(String, Value)>;

/// Default key column used for `returning ... into`.
pub const DEFAULT_KEY_COLUMN: &str = "id";

/// An insert statement, single row or batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertDescriptor {
    pub table: String,
    pub rows: Vec<Row>,
    /// LOB columns written through `EMPTY_BLOB()` + `returning into`
    #[serde(default)]
    pub binary_columns: Vec<(String, Vec<u8>)>,
    /// Generated key column returned by insert-get-id
    #[serde(default)]
    pub sequence_column: Option<String>,
    /// Fetch `nextval` from the key sequence before inserting when the key is absent
    #[serde(default)]
    pub uses_sequence: bool,
    /// Explicit sequence name; derived from table and key column when absent
    #[serde(default)]
    pub sequence_name: Option<String>,
}

impl InsertDescriptor {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// Append a row.
    pub fn row<K: Into<String>, V: Into<Value>>(mut self, values: Vec<(K, V)>) -> Self {
        self.rows
            .push(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Key column, falling back to `id`.
    pub fn key_column(&self) -> &str {
        self.sequence_column.as_deref().unwrap_or(DEFAULT_KEY_COLUMN)
    }

    /// Whether the first row already carries the key.
    pub fn has_explicit_key(&self) -> bool {
        let key = self.key_column();
        self.rows
            .first()
            .is_some_and(|row| row.iter().any(|(c, v)| c.eq_ignore_ascii_case(key) && !v.is_null()))
    }
}

/// An update statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub wheres: Vec<Predicate>,
    #[serde(default)]
    pub binary_columns: Vec<(String, Vec<u8>)>,
    #[serde(default)]
    pub sequence_column: Option<String>,
}

impl UpdateDescriptor {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push((column.to_string(), value.into()));
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.wheres.push(predicate);
        self
    }

    pub fn key_column(&self) -> &str {
        self.sequence_column.as_deref().unwrap_or(DEFAULT_KEY_COLUMN)
    }
}

/// A delete statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteDescriptor {
    pub table: String,
    #[serde(default)]
    pub wheres: Vec<Predicate>,
}

impl DeleteDescriptor {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            wheres: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.wheres.push(predicate);
        self
    }
}
