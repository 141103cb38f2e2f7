//! Compiler test modules.
//!
//! Tests are organized by category:
//! - `select`: pagination, locks, exists, joins and aggregates
//! - `dml`: insert, insert-get-id, LOB variants, update, delete
//! - `schema`: create/alter/drop DDL, indexes, full-text, introspection
//! - `emulation`: sequence/trigger auto-increment and drop plans

mod dml;
mod emulation;
mod select;
