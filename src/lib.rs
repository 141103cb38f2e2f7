//! # qail-oracle — Oracle dialect compiler
//!
//! Compiles dialect-neutral query and schema descriptors into Oracle SQL,
//! emulating what Oracle lacks natively.
//!
//! ## Quick Example
//!
//! ```rust
//! use qail_oracle::prelude::*;
//!
//! let compiler = OracleCompiler::default();
//!
//! let mut query = QueryDescriptor::new("users");
//! query.wheres = vec![Predicate::eq("active", true)];
//! query.limit = Some(10);
//! query.offset = Some(20);
//!
//! let stmt = compiler.compile_select(&query).unwrap();
//! assert!(stmt.sql.contains("between 21 and 30"));
//! ```
//!
//! ## Emulations
//!
//! | Feature          | Oracle form                                      |
//! |------------------|--------------------------------------------------|
//! | limit / offset   | nested `rownum` filter                           |
//! | auto-increment   | sequence + `before insert` trigger               |
//! | batch insert     | `select ... from dual union all ...`             |
//! | generated keys   | `returning ... into`                             |
//! | LOB writes       | `EMPTY_BLOB()` + locator streaming               |
//! | full-text        | `ctxsys.context` index + `MULTI_COLUMN_DATASTORE`|

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod processor;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{IdentifierCase, OracleConfig};
    pub use crate::engine::{LobLocator, OracleSession, OutValue, StatementExecutor};
    pub use crate::error::*;
    pub use crate::parser::{parse_column, parse_columns};
    pub use crate::processor::{ColumnInfo, ForeignKeyInfo, IndexInfo, ResultRow, TableInfo};
    pub use crate::transpiler::{CompiledStatement, OracleCompiler, SqlCompiler};
}

/// Parse a column list such as `id:increments, email:string(100):unique`.
///
/// # Example
///
/// ```
/// let columns = qail_oracle::parse_columns("id:increments, email:string(100)").unwrap();
/// assert_eq!(columns.len(), 2);
/// assert!(columns[0].is_serial());
/// ```
pub fn parse_columns(input: &str) -> error::OracleResult<Vec<ast::ColumnDefinition>> {
    parser::parse_columns(input)
}
