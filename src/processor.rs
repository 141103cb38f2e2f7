//! Marshaling of data-dictionary rows into schema descriptions.
//!
//! Rows arrive as maps keyed however the driver reports column names, so
//! every lookup is case-insensitive. Object names are lower-cased on the
//! way out.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One fetched row, keyed by column name.
pub type ResultRow = HashMap<String, JsonValue>;

/// A table column as reported by `all_tab_cols`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Raw Oracle type name, lower-cased (`varchar2`, `number`, ...)
    pub type_name: String,
    /// Rendered type with length or precision (`varchar2(100)`, `number(10, 2)`)
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub index_type: String,
    pub unique: bool,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub foreign_schema: String,
    pub foreign_table: String,
    pub foreign_columns: Vec<String>,
    /// Oracle has no `on update` action
    pub on_update: Option<String>,
    pub on_delete: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub schema: String,
    pub size: Option<u64>,
    pub comment: Option<String>,
    pub collation: Option<String>,
}

/// Case-insensitive field lookup.
pub fn field<'a>(row: &'a ResultRow, key: &str) -> Option<&'a JsonValue> {
    row.get(key).or_else(|| {
        row.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Field as text. Numbers are stringified, null and missing are `None`.
pub fn text(row: &ResultRow, key: &str) -> Option<String> {
    match field(row, key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Field as an unsigned number, accepting numeric strings.
pub fn number(row: &ResultRow, key: &str) -> Option<u64> {
    match field(row, key)? {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Field as a flag: `true`, non-zero numbers, `Y`/`YES`/`1`.
pub fn flag(row: &ResultRow, key: &str) -> bool {
    match field(row, key) {
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(JsonValue::String(s)) => matches!(s.trim().to_uppercase().as_str(), "Y" | "YES" | "1"),
        _ => false,
    }
}

fn lower(row: &ResultRow, key: &str) -> String {
    text(row, key).unwrap_or_default().to_lowercase()
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|list| {
            list.split(',')
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Lower-cased `column_name` of each row.
pub fn process_column_listing(rows: &[ResultRow]) -> Vec<String> {
    rows.iter().map(|row| lower(row, "column_name")).collect()
}

/// First numeric field of a `count(*)` style row.
pub fn process_count(rows: &[ResultRow]) -> u64 {
    rows.first()
        .and_then(|row| number(row, "count").or_else(|| row.values().find_map(JsonValue::as_u64)))
        .unwrap_or(0)
}

fn render_type(type_name: &str, row: &ResultRow) -> String {
    match type_name {
        "number" => match (number(row, "precision"), number(row, "places")) {
            (Some(p), Some(s)) => format!("number({}, {})", p, s),
            (Some(p), None) => format!("number({})", p),
            _ => type_name.to_string(),
        },
        "float" => match number(row, "precision") {
            Some(p) => format!("float({})", p),
            None => type_name.to_string(),
        },
        "varchar" | "varchar2" | "nvarchar2" | "char" | "nchar" | "raw" => {
            match number(row, "char_length").filter(|n| *n > 0) {
                Some(length) => format!("{}({})", type_name, length),
                None => match number(row, "data_length") {
                    Some(length) => format!("{}({})", type_name, length),
                    None => type_name.to_string(),
                },
            }
        }
        _ => type_name.to_string(),
    }
}

pub fn process_columns(rows: &[ResultRow]) -> Vec<ColumnInfo> {
    rows.iter()
        .map(|row| {
            let type_name = lower(row, "type_name");
            let data_type = render_type(&type_name, row);
            ColumnInfo {
                name: lower(row, "name"),
                type_name,
                data_type,
                nullable: flag(row, "nullable"),
                default: text(row, "default").map(|d| d.trim().to_string()),
                comment: text(row, "comment"),
            }
        })
        .collect()
}

/// One entry per index, columns in the order the rows list them.
pub fn process_indexes(rows: &[ResultRow]) -> Vec<IndexInfo> {
    let mut indexes: Vec<IndexInfo> = Vec::new();
    for row in rows {
        let name = lower(row, "name");
        let column = lower(row, "column_name");
        match indexes.iter_mut().find(|i| i.name == name) {
            Some(index) => index.columns.push(column),
            None => indexes.push(IndexInfo {
                name,
                columns: vec![column],
                index_type: lower(row, "type"),
                unique: flag(row, "unique"),
                primary: flag(row, "primary"),
            }),
        }
    }
    indexes
}

pub fn process_foreign_keys(rows: &[ResultRow]) -> Vec<ForeignKeyInfo> {
    rows.iter()
        .map(|row| ForeignKeyInfo {
            name: lower(row, "name"),
            columns: split_list(text(row, "columns")),
            foreign_schema: lower(row, "foreign_schema"),
            foreign_table: lower(row, "foreign_table"),
            foreign_columns: split_list(text(row, "foreign_columns")),
            on_update: None,
            on_delete: lower(row, "on_delete"),
        })
        .collect()
}

pub fn process_tables(rows: &[ResultRow]) -> Vec<TableInfo> {
    rows.iter()
        .map(|row| TableInfo {
            name: lower(row, "name"),
            schema: lower(row, "schema"),
            size: number(row, "size"),
            comment: text(row, "comment"),
            collation: text(row, "collation"),
        })
        .collect()
}
