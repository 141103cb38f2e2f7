//! Execution seam between compiled statements and an Oracle driver.
//!
//! The driver itself lives outside this crate and is reached through
//! [`StatementExecutor`]. [`OracleSession`] sequences the compiled
//! statements: transactions around locks and LOB writes, the ordering of
//! schema objects, and marshaling of data-dictionary rows.
//!
//! Statements reach the executor with Oracle positional binds (`:1`, `:2`).

use std::collections::HashMap;

use crate::ast::*;
use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult};
use crate::processor::{self, ColumnInfo, ForeignKeyInfo, IndexInfo, ResultRow, TableInfo};
use crate::transpiler::{
    CompiledCall, CompiledStatement, OracleCompiler, SqlCompiler, preferences, procedure,
    sequence, session, trigger,
};

/// Query resolving the session's current schema.
pub const CURRENT_SCHEMA_QUERY: &str =
    "select sys_context('userenv', 'current_schema') as \"schema\" from dual";

/// Driver handle to a LOB returned by `returning ... into`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LobLocator {
    pub column: String,
    pub handle: u64,
}

/// Value of an output bind.
#[derive(Debug, Clone, PartialEq)]
pub enum OutValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Locator(LobLocator),
    Rows(Vec<ResultRow>),
}

impl OutValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OutValue::Int(n) => Some(*n),
            OutValue::Float(f) => Some(*f as i64),
            OutValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_locator(&self) -> Option<&LobLocator> {
        match self {
            OutValue::Locator(locator) => Some(locator),
            _ => None,
        }
    }
}

/// Prepare, bind, execute and fetch against a live connection.
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    /// Run a statement, returning the affected row count.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> OracleResult<u64>;

    async fn query(&mut self, sql: &str, params: &[Value]) -> OracleResult<Vec<ResultRow>>;

    /// Run a statement with output binds, one value per binding.
    async fn execute_returning(
        &mut self,
        sql: &str,
        params: &[Value],
        outputs: &[OutBinding],
    ) -> OracleResult<Vec<OutValue>>;

    /// Stream content into a locator obtained in the current transaction.
    async fn write_lob(&mut self, locator: &LobLocator, data: &[u8]) -> OracleResult<()>;

    /// Run a PL/SQL call with named binds, returning the output binds by name.
    async fn call(&mut self, call: &CompiledCall) -> OracleResult<HashMap<String, OutValue>>;

    async fn begin(&mut self) -> OracleResult<()>;
    async fn commit(&mut self) -> OracleResult<()>;
    async fn rollback(&mut self) -> OracleResult<()>;
}

/// A compiler bound to one executor.
pub struct OracleSession<E> {
    compiler: OracleCompiler,
    executor: E,
    owner: Option<String>,
}

impl<E: StatementExecutor> OracleSession<E> {
    pub fn new(executor: E, config: OracleConfig) -> Self {
        let owner = config.schema_prefix.clone();
        Self {
            compiler: OracleCompiler::new(config),
            executor,
            owner,
        }
    }

    pub fn compiler(&self) -> &OracleCompiler {
        &self.compiler
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Apply the configured NLS formats and session variables.
    pub async fn configure(&mut self) -> OracleResult<()> {
        let sql = session::compile_session_vars(self.compiler.config());
        self.raw(&sql).await.map(|_| ())
    }

    async fn run(&mut self, stmt: &CompiledStatement) -> OracleResult<u64> {
        let sql = stmt.numbered_sql();
        tracing::debug!("execute: {} ({} params)", sql, stmt.params.len());
        self.executor.execute(&sql, &stmt.params).await
    }

    async fn fetch(&mut self, stmt: &CompiledStatement) -> OracleResult<Vec<ResultRow>> {
        let sql = stmt.numbered_sql();
        tracing::debug!("query: {} ({} params)", sql, stmt.params.len());
        self.executor.query(&sql, &stmt.params).await
    }

    async fn raw(&mut self, sql: &str) -> OracleResult<u64> {
        tracing::debug!("execute: {}", sql);
        self.executor.execute(sql, &[]).await
    }

    async fn returning(&mut self, stmt: &CompiledStatement) -> OracleResult<Vec<OutValue>> {
        let sql = stmt.numbered_sql();
        tracing::debug!("execute returning: {} ({} outputs)", sql, stmt.outputs.len());
        self.executor
            .execute_returning(&sql, &stmt.params, &stmt.outputs)
            .await
    }

    /// Roll back and hand the original error on.
    async fn abort<T>(&mut self, err: OracleError) -> OracleResult<T> {
        tracing::warn!("rolling back: {}", err);
        if let Err(rollback) = self.executor.rollback().await {
            tracing::warn!("rollback failed after '{}': {}", err, rollback);
        }
        Err(err)
    }

    // ----- queries -----

    /// Run a select. A requested lock runs inside its own transaction.
    pub async fn select(&mut self, query: &QueryDescriptor) -> OracleResult<Vec<ResultRow>> {
        let stmt = self.compiler.compile_select(query)?;
        if !query.has_lock() {
            return self.fetch(&stmt).await;
        }

        self.executor.begin().await?;
        match self.fetch(&stmt).await {
            Ok(rows) => {
                self.executor.commit().await?;
                Ok(rows)
            }
            Err(err) => self.abort(err).await,
        }
    }

    pub async fn exists(&mut self, query: &QueryDescriptor) -> OracleResult<bool> {
        let stmt = self.compiler.compile_exists(query)?;
        Ok(!self.fetch(&stmt).await?.is_empty())
    }

    pub async fn insert(&mut self, insert: &InsertDescriptor) -> OracleResult<u64> {
        let stmt = self.compiler.compile_insert(insert)?;
        self.run(&stmt).await
    }

    /// Fill the key from its sequence when the descriptor asks for it.
    async fn assign_sequence_key(&mut self, insert: &InsertDescriptor) -> OracleResult<InsertDescriptor> {
        let mut insert = insert.clone();
        if !insert.uses_sequence || insert.rows.len() != 1 || insert.has_explicit_key() {
            return Ok(insert);
        }

        let key = insert.key_column().to_string();
        let name = match &insert.sequence_name {
            Some(name) => name.clone(),
            None => self.compiler.auto_increment().sequence_name(&insert.table, &key),
        };
        let id = self.next_value(&name).await?;
        if let Some(row) = insert.rows.first_mut() {
            row.retain(|(c, _)| !c.eq_ignore_ascii_case(&key));
            row.insert(0, (key, Value::Int(id)));
        }
        Ok(insert)
    }

    /// Insert one row and return its key, generated or explicit.
    pub async fn insert_get_id(&mut self, insert: &InsertDescriptor) -> OracleResult<Option<i64>> {
        let insert = self.assign_sequence_key(insert).await?;
        let stmt = self.compiler.compile_insert_get_id(&insert)?;

        if stmt.outputs.is_empty() {
            self.run(&stmt).await?;
            return Ok(explicit_key(&insert));
        }
        let outputs = self.returning(&stmt).await?;
        Ok(outputs.first().and_then(OutValue::as_i64))
    }

    /// Insert with `EMPTY_BLOB()` placeholders, then stream every binary
    /// column into its returned locator inside one transaction.
    pub async fn insert_lob(&mut self, insert: &InsertDescriptor) -> OracleResult<Option<i64>> {
        if insert.binary_columns.is_empty() {
            return self.insert_get_id(insert).await;
        }
        let insert = self.assign_sequence_key(insert).await?;
        let stmt = self.compiler.compile_insert_lob(&insert)?;
        self.write_lobs(&stmt, &insert.binary_columns).await
    }

    pub async fn update(&mut self, update: &UpdateDescriptor) -> OracleResult<u64> {
        let stmt = self.compiler.compile_update(update)?;
        self.run(&stmt).await
    }

    /// Update with `EMPTY_BLOB()` placeholders and stream the binary columns.
    pub async fn update_lob(&mut self, update: &UpdateDescriptor) -> OracleResult<Option<i64>> {
        if update.binary_columns.is_empty() {
            self.update(update).await?;
            return Ok(None);
        }
        let stmt = self.compiler.compile_update_lob(update)?;
        self.write_lobs(&stmt, &update.binary_columns).await
    }

    async fn write_lobs(
        &mut self,
        stmt: &CompiledStatement,
        binary: &[(String, Vec<u8>)],
    ) -> OracleResult<Option<i64>> {
        self.executor.begin().await?;

        let outputs = match self.returning(stmt).await {
            Ok(outputs) => outputs,
            Err(err) => return self.abort(err).await,
        };

        for (index, (column, data)) in binary.iter().enumerate() {
            let Some(locator) = outputs.get(index).and_then(OutValue::as_locator) else {
                let err = OracleError::LobWrite {
                    column: column.clone(),
                    message: "no locator returned".to_string(),
                };
                return self.abort(err).await;
            };
            let locator = locator.clone();
            tracing::debug!("writing {} bytes into {}", data.len(), column);
            if let Err(err) = self.executor.write_lob(&locator, data).await {
                let err = OracleError::LobWrite {
                    column: column.clone(),
                    message: err.to_string(),
                };
                return self.abort(err).await;
            }
        }

        self.executor.commit().await?;
        Ok(outputs.get(binary.len()).and_then(OutValue::as_i64))
    }

    pub async fn delete(&mut self, delete: &DeleteDescriptor) -> OracleResult<u64> {
        let stmt = self.compiler.compile_delete(delete)?;
        self.run(&stmt).await
    }

    pub async fn truncate(&mut self, table: &str) -> OracleResult<()> {
        let sql = self.compiler.compile_truncate(table);
        self.raw(&sql).await.map(|_| ())
    }

    // ----- schema -----

    async fn apply(&mut self, blueprint: &TableBlueprint) -> OracleResult<()> {
        let statements = self.compiler.compile_blueprint(blueprint)?;
        tracing::info!("{}: {} statement(s)", blueprint.name, statements.len());
        for sql in &statements {
            self.raw(sql).await?;
        }
        Ok(())
    }

    /// Create a table with its preferences, comments and auto-increment objects.
    pub async fn create(&mut self, blueprint: &TableBlueprint) -> OracleResult<()> {
        if !blueprint.creating() {
            let mut blueprint = blueprint.clone();
            blueprint.commands.insert(0, SchemaCommand::Create);
            return self.apply(&blueprint).await;
        }
        self.apply(blueprint).await
    }

    pub async fn alter(&mut self, blueprint: &TableBlueprint) -> OracleResult<()> {
        self.apply(blueprint).await
    }

    pub async fn drop(&mut self, table: &str) -> OracleResult<()> {
        self.drop_table(table, false).await
    }

    pub async fn drop_if_exists(&mut self, table: &str) -> OracleResult<()> {
        self.drop_table(table, true).await
    }

    async fn drop_table(&mut self, table: &str, if_exists: bool) -> OracleResult<()> {
        let primary_key = self.primary_key(table).await?;
        let plan = self
            .compiler
            .compile_drop_table(table, primary_key.as_deref(), if_exists);
        for stmt in &plan {
            self.run(stmt).await?;
        }
        Ok(())
    }

    /// First primary key column of a table, if it has one.
    pub async fn primary_key(&mut self, table: &str) -> OracleResult<Option<String>> {
        let stmt = self.compiler.compile_primary_key_lookup(table);
        let rows = self.fetch(&stmt).await?;
        Ok(rows
            .first()
            .and_then(|row| processor::text(row, "column_name"))
            .map(|c| c.to_lowercase()))
    }

    /// Drop every preference, table and sequence of the user.
    pub async fn drop_all_tables(&mut self) -> OracleResult<()> {
        self.raw(&preferences::compile_drop_all()).await?;
        let sql = self.compiler.compile_drop_all_tables();
        self.raw(&sql).await.map(|_| ())
    }

    /// Schema used for introspection: the configured prefix, else the
    /// session's current schema.
    pub async fn owner(&mut self) -> OracleResult<String> {
        if let Some(owner) = &self.owner {
            return Ok(owner.clone());
        }
        let rows = self
            .fetch(&CompiledStatement::new(CURRENT_SCHEMA_QUERY))
            .await?;
        let owner = rows
            .first()
            .and_then(|row| processor::text(row, "schema"))
            .ok_or_else(|| OracleError::Execution("current schema is unknown".to_string()))?;
        self.owner = Some(owner.clone());
        Ok(owner)
    }

    pub async fn has_table(&mut self, table: &str) -> OracleResult<bool> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_table_exists(&owner, table);
        Ok(!self.fetch(&stmt).await?.is_empty())
    }

    pub async fn has_column(&mut self, table: &str, column: &str) -> OracleResult<bool> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_column_exists(&owner, table, column);
        Ok(processor::process_count(&self.fetch(&stmt).await?) > 0)
    }

    pub async fn column_listing(&mut self, table: &str) -> OracleResult<Vec<String>> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_column_listing(&owner, table);
        Ok(processor::process_column_listing(&self.fetch(&stmt).await?))
    }

    pub async fn columns(&mut self, table: &str) -> OracleResult<Vec<ColumnInfo>> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_columns(&owner, table);
        Ok(processor::process_columns(&self.fetch(&stmt).await?))
    }

    pub async fn indexes(&mut self, table: &str) -> OracleResult<Vec<IndexInfo>> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_indexes(&owner, table);
        Ok(processor::process_indexes(&self.fetch(&stmt).await?))
    }

    pub async fn foreign_keys(&mut self, table: &str) -> OracleResult<Vec<ForeignKeyInfo>> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_foreign_keys(&owner, table);
        Ok(processor::process_foreign_keys(&self.fetch(&stmt).await?))
    }

    pub async fn tables(&mut self) -> OracleResult<Vec<TableInfo>> {
        let owner = self.owner().await?;
        let stmt = self.compiler.compile_tables(&owner);
        Ok(processor::process_tables(&self.fetch(&stmt).await?))
    }

    pub async fn enable_foreign_keys(&mut self) -> OracleResult<()> {
        let owner = self.owner().await?;
        let sql = self.compiler.compile_enable_foreign_keys(&owner);
        self.raw(&sql).await.map(|_| ())
    }

    pub async fn disable_foreign_keys(&mut self) -> OracleResult<()> {
        let owner = self.owner().await?;
        let sql = self.compiler.compile_disable_foreign_keys(&owner);
        self.raw(&sql).await.map(|_| ())
    }

    // ----- sequences and triggers -----

    pub async fn create_sequence(&mut self, spec: &SequenceSpec) -> OracleResult<()> {
        let sql = sequence::compile_create(self.compiler.wrapper(), spec);
        self.raw(&sql).await.map(|_| ())
    }

    pub async fn drop_sequence(&mut self, name: &str) -> OracleResult<()> {
        let sql = sequence::compile_drop(self.compiler.wrapper(), name);
        self.raw(&sql).await.map(|_| ())
    }

    pub async fn sequence_exists(&mut self, name: &str) -> OracleResult<bool> {
        Ok(!self.fetch(&sequence::compile_exists(name)).await?.is_empty())
    }

    async fn sequence_value(&mut self, sql: String) -> OracleResult<i64> {
        let rows = self.fetch(&CompiledStatement::new(sql)).await?;
        rows.first()
            .and_then(|row| processor::number(row, "id"))
            .map(|n| n as i64)
            .ok_or_else(|| OracleError::Execution("sequence returned no value".to_string()))
    }

    pub async fn next_value(&mut self, name: &str) -> OracleResult<i64> {
        let sql = sequence::compile_next_value(self.compiler.wrapper(), name);
        self.sequence_value(sql).await
    }

    pub async fn current_value(&mut self, name: &str) -> OracleResult<i64> {
        let sql = sequence::compile_current_value(self.compiler.wrapper(), name);
        self.sequence_value(sql).await
    }

    /// Last value drawn from `name` in this session.
    pub async fn last_insert_id(&mut self, name: &str) -> OracleResult<i64> {
        self.current_value(name).await
    }

    pub async fn trigger_exists(&mut self, name: &str) -> OracleResult<bool> {
        Ok(!self.fetch(&trigger::compile_exists(name)).await?.is_empty())
    }

    pub async fn drop_trigger(&mut self, name: &str) -> OracleResult<()> {
        let sql = trigger::compile_drop(self.compiler.wrapper(), name);
        self.raw(&sql).await.map(|_| ())
    }

    // ----- procedures -----

    pub async fn call_procedure(
        &mut self,
        call: &ProcedureCall,
    ) -> OracleResult<HashMap<String, OutValue>> {
        let compiled = procedure::compile_procedure(call)?;
        tracing::debug!("call: {}", compiled.sql);
        self.executor.call(&compiled).await
    }

    /// Call a stored function and return its result bind.
    pub async fn call_function(
        &mut self,
        call: &ProcedureCall,
        returns: OutBinding,
    ) -> OracleResult<OutValue> {
        let compiled = procedure::compile_function(call, returns)?;
        tracing::debug!("call: {}", compiled.sql);
        let mut outputs = self.executor.call(&compiled).await?;
        Ok(outputs
            .remove(procedure::RESULT_BIND)
            .unwrap_or(OutValue::Null))
    }
}

fn explicit_key(insert: &InsertDescriptor) -> Option<i64> {
    let key = insert.key_column();
    insert.rows.first()?.iter().find_map(|(c, v)| match v {
        Value::Int(n) if c.eq_ignore_ascii_case(key) => Some(*n),
        _ => None,
    })
}
