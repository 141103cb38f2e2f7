//! Identifier wrapping and derived object naming.
//!
//! Oracle identifiers are left unquoted unless they collide with a reserved
//! word, in which case they are upper-cased and double-quoted. Names the
//! compiler invents (indexes, sequences, triggers) are shortened to the
//! configured identifier limit one character at a time, always from the
//! longest underscore-delimited segment.

use crate::ast::{IndexKind, Value};
use crate::config::{IdentifierCase, OracleConfig};

/// Oracle reserved words (V$RESERVED_WORDS with `reserved = 'Y'`).
pub const RESERVED_WORDS: &[&str] = &[
    "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY", "CHAR",
    "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMPRESS", "CONNECT", "CREATE", "CURRENT", "DATE",
    "DECIMAL", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "EXCLUSIVE", "EXISTS",
    "FILE", "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING", "IDENTIFIED", "IMMEDIATE", "IN",
    "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER", "INTERSECT", "INTO", "IS", "LEVEL",
    "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE", "MODIFY", "NOAUDIT",
    "NOCOMPRESS", "NOT", "NOWAIT", "NULL", "NUMBER", "OF", "OFFLINE", "ON", "ONLINE", "OPTION",
    "OR", "ORDER", "PCTFREE", "PRIOR", "PRIVILEGES", "PUBLIC", "RAW", "RENAME", "RESOURCE",
    "REVOKE", "ROW", "ROWID", "ROWNUM", "ROWS", "SELECT", "SESSION", "SET", "SHARE", "SIZE",
    "SMALLINT", "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TABLE", "THEN", "TO", "TRIGGER",
    "UID", "UNION", "UNIQUE", "UPDATE", "USER", "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2",
    "VIEW", "WHENEVER", "WHERE", "WITH",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Placeholder list for a set of values: `?, ?, sysdate`.
pub fn parameterize<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
    values
        .into_iter()
        .map(Value::placeholder)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split `expr as alias` (case-insensitive) into its two halves.
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    lower
        .find(" as ")
        .map(|pos| (value[..pos].trim(), value[pos + 4..].trim()))
}

/// Shorten `name` to at most `max_length` bytes.
///
/// Each step removes the last character of the longest segment (first one
/// on ties). Segments are kept at two characters while longer ones remain,
/// then cut down to one. A name made of too many segments to fit even then
/// is truncated outright.
pub fn shorten(name: &str, max_length: usize) -> String {
    let mut parts: Vec<String> = name.split('_').map(str::to_string).collect();
    let mut len = name.len();

    for floor in [2, 1] {
        while len > max_length {
            let Some(index) = longest_segment(&parts, floor) else {
                break;
            };
            if let Some(removed) = parts[index].pop() {
                len -= removed.len_utf8();
            }
        }
    }

    let mut shortened = parts.join("_");
    if shortened.len() > max_length {
        tracing::warn!(
            "object name '{}' truncated to {} characters",
            shortened,
            max_length
        );
        let mut end = max_length;
        while !shortened.is_char_boundary(end) {
            end -= 1;
        }
        shortened.truncate(end);
        while shortened.ends_with('_') {
            shortened.pop();
        }
    }
    shortened
}

/// Index of the longest segment with more than `floor` characters.
fn longest_segment(parts: &[String], floor: usize) -> Option<usize> {
    parts
        .iter()
        .enumerate()
        .filter(|(_, part)| part.chars().count() > floor)
        .fold(None::<(usize, usize)>, |best, (i, part)| {
            let n = part.chars().count();
            match best {
                Some((_, best_len)) if best_len >= n => best,
                _ => Some((i, n)),
            }
        })
        .map(|(i, _)| i)
}

/// Identifier wrapper bound to one connection's configuration.
#[derive(Debug, Clone)]
pub struct Wrapper {
    schema_prefix: Option<String>,
    table_prefix: String,
    max_length: usize,
    case: IdentifierCase,
}

impl Wrapper {
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            schema_prefix: config.schema_prefix.clone(),
            table_prefix: config.table_prefix.clone(),
            max_length: config.max_identifier_length,
            case: config.identifier_case,
        }
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Wrap a single identifier segment.
    pub fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        if is_reserved(value) {
            return format!("\"{}\"", value.to_uppercase().replace('"', "\"\""));
        }
        match self.case {
            IdentifierCase::Preserve => value.to_string(),
            IdentifierCase::Upper => value.to_uppercase(),
        }
    }

    /// Wrap a column reference: `col`, `table.col`, `col as alias`.
    pub fn wrap(&self, value: &str) -> String {
        if let Some((expr, alias)) = split_alias(value) {
            return format!("{} as {}", self.wrap(expr), self.wrap_value(alias));
        }

        let segments: Vec<&str> = value.split('.').collect();
        let last = segments.len() - 1;
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if last > 0 && i == last - 1 {
                    self.wrap_value(&format!("{}{}", self.table_prefix, segment))
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap a table reference, injecting schema then table prefix.
    /// An `as` alias becomes Oracle's bare `table alias` form.
    pub fn wrap_table(&self, table: &str) -> String {
        if let Some((name, alias)) = split_alias(table) {
            return format!("{} {}", self.wrap_table(name), self.wrap_value(alias));
        }

        match table.split_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                self.wrap_value(schema),
                self.wrap_value(&format!("{}{}", self.table_prefix, name))
            ),
            None => {
                let wrapped = self.wrap_value(&format!("{}{}", self.table_prefix, table));
                match &self.schema_prefix {
                    Some(schema) => format!("{}.{}", self.wrap_value(schema), wrapped),
                    None => wrapped,
                }
            }
        }
    }

    /// Comma-separated wrapped column list.
    pub fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| self.wrap(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Qualify a derived object (sequence, trigger) with the schema prefix.
    pub fn qualify(&self, object: &str) -> String {
        match &self.schema_prefix {
            Some(schema) => format!("{}.{}", self.wrap_value(schema), object),
            None => object.to_string(),
        }
    }

    /// Prefixed table name as stored in the data dictionary, without schema.
    pub fn prefixed_table(&self, table: &str) -> String {
        let bare = table.rsplit('.').next().unwrap_or(table);
        format!("{}{}", self.table_prefix, bare)
    }

    pub fn shorten(&self, name: &str) -> String {
        shorten(name, self.max_length)
    }

    /// `prefix + table + "_" + column + "_" + suffix`, shortened.
    pub fn object_name(&self, table: &str, column: &str, suffix: &str) -> String {
        self.shorten(&format!(
            "{}_{}_{}",
            self.prefixed_table(table),
            column,
            suffix
        ))
    }

    /// Default index name: lower-cased `prefix + table + "_" + cols + "_" + kind`.
    pub fn index_name<S: AsRef<str>>(&self, table: &str, kind: IndexKind, columns: &[S]) -> String {
        let mut parts = vec![format!("{}{}", self.table_prefix, table)];
        parts.extend(columns.iter().map(|c| c.as_ref().to_string()));
        parts.push(kind.suffix().to_string());

        let name = parts
            .join("_")
            .to_lowercase()
            .replace(['-', '.'], "_");
        self.shorten(&name)
    }
}
