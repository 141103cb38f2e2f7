//! Error types for the Oracle compiler.

use thiserror::Error;

/// The main error type for Oracle compilation and execution.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Insert descriptor carried no rows.
    #[error("Insert requires at least one row")]
    EmptyInsert,

    /// A batch row does not share the column set of the first row.
    #[error("Column mismatch in row {row}: expected [{expected}], found [{found}]")]
    ColumnMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    /// `change` command without any column marked for modification.
    #[error("Change command on '{table}' has no column to modify")]
    MissingChangeColumn { table: String },

    /// Operator outside the accepted set.
    #[error("Invalid operator: '{0}'")]
    InvalidOperator(String),

    /// Identifier that cannot be wrapped safely.
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Any other malformed descriptor.
    #[error("Compilation error: {0}")]
    Compile(String),

    /// Failed to parse a column specification.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Database error reported by the statement executor.
    #[error("Database error: {0}")]
    Database(String),

    /// Statement execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Writing into a returned LOB locator failed.
    #[error("LOB write failed for column '{column}': {message}")]
    LobWrite { column: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OracleError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a generic compilation error.
    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile(message.into())
    }

    /// Errors raised before any SQL reaches the database.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInsert
                | Self::ColumnMismatch { .. }
                | Self::MissingChangeColumn { .. }
                | Self::InvalidOperator(_)
                | Self::InvalidIdentifier(_)
                | Self::Compile(_)
        )
    }
}

/// Result type alias for Oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
