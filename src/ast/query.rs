use crate::ast::Value;
use serde::{Deserialize, Serialize};

/// An entry of the select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference, optionally qualified (`users.id`) or aliased (`name as n`)
    Column(String),
    /// Raw SQL emitted as-is
    Raw(String),
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Column(s.to_string())
    }
}

/// Logical connector joining a predicate to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boolean {
    #[default]
    And,
    Or,
}

impl Boolean {
    pub fn keyword(&self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
        }
    }
}

/// Date part extracted by a date-based predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePart {
    Date,
    Time,
    Day,
    Month,
    Year,
}

/// A single where/having/join condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default)]
    pub boolean: Boolean,
    pub kind: PredicateKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateKind {
    /// `column op ?`
    Basic {
        column: String,
        operator: String,
        value: Value,
    },
    /// `column [not] in (...)`
    In {
        column: String,
        values: Vec<Value>,
        #[serde(default)]
        negated: bool,
    },
    /// `column is [not] null`
    Null {
        column: String,
        #[serde(default)]
        negated: bool,
    },
    /// `column [not] between ? and ?`
    Between {
        column: String,
        low: Value,
        high: Value,
        #[serde(default)]
        negated: bool,
    },
    /// `first op second`, both columns
    Column {
        first: String,
        operator: String,
        second: String,
    },
    /// Parenthesized group
    Nested(Vec<Predicate>),
    /// `[not] exists (subquery)`
    Exists {
        query: Box<QueryDescriptor>,
        #[serde(default)]
        negated: bool,
    },
    /// whereDate / whereTime / whereDay / whereMonth / whereYear
    Date {
        part: DatePart,
        column: String,
        operator: String,
        value: Value,
    },
    /// Raw fragment with its own bindings
    Raw {
        sql: String,
        #[serde(default)]
        bindings: Vec<Value>,
    },
}

impl Predicate {
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            boolean: Boolean::And,
            kind,
        }
    }

    /// Switch the connector to `or`.
    pub fn or(mut self) -> Self {
        self.boolean = Boolean::Or;
        self
    }

    pub fn basic(column: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Basic {
            column: column.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        })
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::basic(column, "=", value)
    }

    pub fn is_in(column: &str, values: Vec<Value>) -> Self {
        Self::new(PredicateKind::In {
            column: column.to_string(),
            values,
            negated: false,
        })
    }

    pub fn not_in(column: &str, values: Vec<Value>) -> Self {
        Self::new(PredicateKind::In {
            column: column.to_string(),
            values,
            negated: true,
        })
    }

    pub fn is_null(column: &str) -> Self {
        Self::new(PredicateKind::Null {
            column: column.to_string(),
            negated: false,
        })
    }

    pub fn columns(first: &str, operator: &str, second: &str) -> Self {
        Self::new(PredicateKind::Column {
            first: first.to_string(),
            operator: operator.to_string(),
            second: second.to_string(),
        })
    }

    pub fn date(part: DatePart, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Date {
            part,
            column: column.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        })
    }

    pub fn raw(sql: &str) -> Self {
        Self::new(PredicateKind::Raw {
            sql: sql.to_string(),
            bindings: Vec::new(),
        })
    }

    pub fn nested(predicates: Vec<Predicate>) -> Self {
        Self::new(PredicateKind::Nested(predicates))
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Cross => "cross",
        }
    }
}

/// A join definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    #[serde(default)]
    pub on: Vec<Predicate>,
}

impl Join {
    pub fn inner(table: &str, first: &str, second: &str) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.to_string(),
            on: vec![Predicate::columns(first, "=", second)],
        }
    }

    pub fn left(table: &str, first: &str, second: &str) -> Self {
        Self {
            kind: JoinKind::Left,
            ..Self::inner(table, first, second)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// An `order by` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ordering {
    Column {
        column: String,
        #[serde(default)]
        direction: SortOrder,
    },
    Raw(String),
}

impl Ordering {
    pub fn asc(column: &str) -> Self {
        Ordering::Column {
            column: column.to_string(),
            direction: SortOrder::Asc,
        }
    }

    pub fn desc(column: &str) -> Self {
        Ordering::Column {
            column: column.to_string(),
            direction: SortOrder::Desc,
        }
    }
}

/// Row lock requested on a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lock {
    /// `for update`
    Update,
    /// Shared lock. Oracle has no row-level shared lock, so this compiles to nothing.
    Shared,
    /// Lock clause emitted verbatim (e.g. `for update skip locked`)
    Raw(String),
}

impl Lock {
    /// Whether the lock produces a clause, and therefore suppresses pagination.
    pub fn is_requested(&self) -> bool {
        match self {
            Lock::Update => true,
            Lock::Shared => false,
            Lock::Raw(sql) => !sql.trim().is_empty(),
        }
    }
}

/// Aggregate function projected instead of the column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// `count`, `sum`, `avg`, `min`, `max`
    pub function: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

/// A dialect-neutral select query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub table: String,
    /// Select list; empty means `*`
    #[serde(default)]
    pub columns: Vec<Expr>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub aggregate: Option<Aggregate>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub wheres: Vec<Predicate>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub havings: Vec<Predicate>,
    #[serde(default)]
    pub order_by: Vec<Ordering>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub lock: Option<Lock>,
}

impl QueryDescriptor {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// True when a lock clause will be emitted.
    pub fn has_lock(&self) -> bool {
        self.lock.as_ref().is_some_and(Lock::is_requested)
    }

    /// True when limit or offset is set to a positive value.
    pub fn is_paginated(&self) -> bool {
        self.limit.unwrap_or(0) > 0 || self.offset.unwrap_or(0) > 0
    }
}
