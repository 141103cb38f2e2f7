//! Oracle objects created alongside tables: sequences, triggers and
//! Oracle Text preferences.

use serde::{Deserialize, Serialize};

/// A sequence definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    pub name: String,
    pub start_value: u64,
    pub min_value: u64,
    #[serde(default)]
    pub max_value: Option<u64>,
    pub increment_by: u64,
    #[serde(default)]
    pub nocache: bool,
}

impl SequenceSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start_value: 1,
            min_value: 1,
            max_value: None,
            increment_by: 1,
            nocache: false,
        }
    }

    pub fn start_with(mut self, start: u64) -> Self {
        self.start_value = start;
        self
    }

    pub fn max_value(mut self, max: u64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn nocache(mut self) -> Self {
        self.nocache = true;
        self
    }
}

/// A `before insert` trigger filling a column from a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub name: String,
    pub table: String,
    pub column: String,
    pub sequence_name: String,
}

/// A `MULTI_COLUMN_DATASTORE` preference backing a multi-column full-text index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTextPreference {
    pub name: String,
    pub columns: Vec<String>,
}
