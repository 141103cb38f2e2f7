//! Compiler trait.

use super::CompiledStatement;
use crate::ast::*;
use crate::error::OracleResult;

/// Descriptor-to-SQL compilation for one dialect.
///
/// Query methods return SQL with `?` placeholders and the ordered
/// parameters. Schema methods return plain DDL, possibly several
/// statements that must run in the given order.
pub trait SqlCompiler {
    /// Select, with ROWNUM pagination unless a lock is requested.
    fn compile_select(&self, query: &QueryDescriptor) -> OracleResult<CompiledStatement>;
    /// `select 1 as "exists" ... rownum = 1`.
    fn compile_exists(&self, query: &QueryDescriptor) -> OracleResult<CompiledStatement>;
    /// Single row `values` or multi-row `union all select ... from dual`.
    fn compile_insert(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement>;
    /// Insert returning the generated key.
    fn compile_insert_get_id(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement>;
    /// Insert with `EMPTY_BLOB()` placeholders returning LOB locators.
    fn compile_insert_lob(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement>;
    fn compile_update(&self, update: &UpdateDescriptor) -> OracleResult<CompiledStatement>;
    /// Update with `EMPTY_BLOB()` placeholders returning LOB locators.
    fn compile_update_lob(&self, update: &UpdateDescriptor) -> OracleResult<CompiledStatement>;
    fn compile_delete(&self, delete: &DeleteDescriptor) -> OracleResult<CompiledStatement>;
    fn compile_truncate(&self, table: &str) -> String;

    /// Every statement a blueprint needs, in execution order.
    fn compile_blueprint(&self, blueprint: &TableBlueprint) -> OracleResult<Vec<String>>;
    /// Drop a table together with its emulation objects. `primary_key` is the
    /// column found by [`compile_primary_key_lookup`](Self::compile_primary_key_lookup).
    fn compile_drop_table(
        &self,
        table: &str,
        primary_key: Option<&str>,
        if_exists: bool,
    ) -> Vec<CompiledStatement>;
    fn compile_drop_all_tables(&self) -> String;

    fn compile_table_exists(&self, schema: &str, table: &str) -> CompiledStatement;
    fn compile_column_listing(&self, schema: &str, table: &str) -> CompiledStatement;
    fn compile_column_exists(&self, schema: &str, table: &str, column: &str) -> CompiledStatement;
    fn compile_columns(&self, schema: &str, table: &str) -> CompiledStatement;
    fn compile_indexes(&self, schema: &str, table: &str) -> CompiledStatement;
    fn compile_foreign_keys(&self, schema: &str, table: &str) -> CompiledStatement;
    fn compile_tables(&self, schema: &str) -> CompiledStatement;
    fn compile_enable_foreign_keys(&self, owner: &str) -> String;
    fn compile_disable_foreign_keys(&self, owner: &str) -> String;
    fn compile_primary_key_lookup(&self, table: &str) -> CompiledStatement;
}
