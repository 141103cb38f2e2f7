//! Oracle SQL compiler.
//!
//! Turns dialect-neutral descriptors into Oracle SQL text plus an ordered
//! parameter list. Placeholders are emitted as `?`; output binds (generated
//! keys, LOB locators) follow the input parameters positionally and are
//! described by [`CompiledStatement::outputs`].

pub mod auto_increment;
pub mod conditions;
pub mod ddl;
pub mod dml;
pub mod preferences;
pub mod procedure;
pub mod sequence;
pub mod session;
pub mod traits;
pub mod trigger;
pub mod types;
pub mod wrapper;

#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::config::OracleConfig;
use crate::error::OracleResult;

pub use auto_increment::AutoIncrement;
pub use procedure::CompiledCall;
pub use traits::SqlCompiler;
pub use wrapper::Wrapper;

/// A compiled statement ready for the executor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<Value>,
    /// `returning ... into` binds, in placeholder order after `params`
    pub outputs: Vec<OutBinding>,
}

impl CompiledStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            outputs: Vec::new(),
        }
    }

    /// Rewrite `?` placeholders into Oracle positional binds (`:1`, `:2`, ...).
    /// Question marks inside string literals or quoted identifiers are kept.
    pub fn numbered_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + 8);
        let mut index = 0;
        let mut in_literal = false;
        let mut in_identifier = false;

        for ch in self.sql.chars() {
            match ch {
                '\'' if !in_identifier => {
                    in_literal = !in_literal;
                    out.push(ch);
                }
                '"' if !in_literal => {
                    in_identifier = !in_identifier;
                    out.push(ch);
                }
                '?' if !in_literal && !in_identifier => {
                    index += 1;
                    out.push(':');
                    out.push_str(&index.to_string());
                }
                _ => out.push(ch),
            }
        }
        out
    }
}

/// The Oracle dialect compiler.
#[derive(Debug, Clone)]
pub struct OracleCompiler {
    config: OracleConfig,
    wrapper: Wrapper,
}

impl Default for OracleCompiler {
    fn default() -> Self {
        Self::new(OracleConfig::default())
    }
}

impl OracleCompiler {
    pub fn new(config: OracleConfig) -> Self {
        let wrapper = Wrapper::new(&config);
        Self { config, wrapper }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn wrapper(&self) -> &Wrapper {
        &self.wrapper
    }

    pub fn auto_increment(&self) -> AutoIncrement<'_> {
        AutoIncrement::new(&self.wrapper)
    }
}

impl SqlCompiler for OracleCompiler {
    fn compile_select(&self, query: &QueryDescriptor) -> OracleResult<CompiledStatement> {
        dml::select::build_select(self, query)
    }

    fn compile_exists(&self, query: &QueryDescriptor) -> OracleResult<CompiledStatement> {
        dml::select::build_exists(self, query)
    }

    fn compile_insert(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement> {
        dml::insert::build_insert(self, insert)
    }

    fn compile_insert_get_id(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement> {
        dml::insert::build_insert_get_id(self, insert)
    }

    fn compile_insert_lob(&self, insert: &InsertDescriptor) -> OracleResult<CompiledStatement> {
        dml::insert::build_insert_lob(self, insert)
    }

    fn compile_update(&self, update: &UpdateDescriptor) -> OracleResult<CompiledStatement> {
        dml::update::build_update(self, update)
    }

    fn compile_update_lob(&self, update: &UpdateDescriptor) -> OracleResult<CompiledStatement> {
        dml::update::build_update_lob(self, update)
    }

    fn compile_delete(&self, delete: &DeleteDescriptor) -> OracleResult<CompiledStatement> {
        dml::delete::build_delete(self, delete)
    }

    fn compile_truncate(&self, table: &str) -> String {
        dml::delete::build_truncate(self, table)
    }

    fn compile_blueprint(&self, blueprint: &TableBlueprint) -> OracleResult<Vec<String>> {
        ddl::build_blueprint(self, blueprint)
    }

    fn compile_drop_table(
        &self,
        table: &str,
        primary_key: Option<&str>,
        if_exists: bool,
    ) -> Vec<CompiledStatement> {
        ddl::build_drop_plan(self, table, primary_key, if_exists)
    }

    fn compile_drop_all_tables(&self) -> String {
        ddl::table::build_drop_all_tables()
    }

    fn compile_table_exists(&self, schema: &str, table: &str) -> CompiledStatement {
        ddl::introspect::table_exists(self, schema, table)
    }

    fn compile_column_listing(&self, schema: &str, table: &str) -> CompiledStatement {
        ddl::introspect::column_listing(self, schema, table)
    }

    fn compile_column_exists(&self, schema: &str, table: &str, column: &str) -> CompiledStatement {
        ddl::introspect::column_exists(self, schema, table, column)
    }

    fn compile_columns(&self, schema: &str, table: &str) -> CompiledStatement {
        ddl::introspect::columns(self, schema, table)
    }

    fn compile_indexes(&self, schema: &str, table: &str) -> CompiledStatement {
        ddl::introspect::indexes(self, schema, table)
    }

    fn compile_foreign_keys(&self, schema: &str, table: &str) -> CompiledStatement {
        ddl::introspect::foreign_keys(self, schema, table)
    }

    fn compile_tables(&self, schema: &str) -> CompiledStatement {
        ddl::introspect::tables(schema)
    }

    fn compile_enable_foreign_keys(&self, owner: &str) -> String {
        ddl::introspect::toggle_foreign_keys(owner, true)
    }

    fn compile_disable_foreign_keys(&self, owner: &str) -> String {
        ddl::introspect::toggle_foreign_keys(owner, false)
    }

    fn compile_primary_key_lookup(&self, table: &str) -> CompiledStatement {
        self.auto_increment().primary_key_lookup(table)
    }
}
