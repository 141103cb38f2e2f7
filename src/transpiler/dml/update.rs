use crate::ast::*;
use crate::error::{OracleError, OracleResult};
use crate::transpiler::conditions::{compile_joins, compile_wheres};
use crate::transpiler::{CompiledStatement, OracleCompiler};

/// `update T [joins] set ... [where ...]` plus its ordered parameters:
/// join bindings, then assignments, then wheres.
fn compile_update_body(
    compiler: &OracleCompiler,
    update: &UpdateDescriptor,
    extra_sets: &[String],
) -> OracleResult<CompiledStatement> {
    if update.assignments.is_empty() && extra_sets.is_empty() {
        return Err(OracleError::compile(format!(
            "update of '{}' has no assignments",
            update.table
        )));
    }

    let w = compiler.wrapper();
    let mut params = Vec::new();

    let mut sql = format!("update {}", w.wrap_table(&update.table));
    if !update.joins.is_empty() {
        sql.push(' ');
        sql.push_str(&compile_joins(compiler, &update.joins, &mut params)?);
    }

    let mut sets: Vec<String> = Vec::with_capacity(update.assignments.len() + extra_sets.len());
    for (column, value) in &update.assignments {
        if !value.is_raw() {
            params.push(value.clone());
        }
        sets.push(format!("{} = {}", w.wrap(column), value.placeholder()));
    }
    sets.extend(extra_sets.iter().cloned());
    sql.push_str(" set ");
    sql.push_str(&sets.join(", "));

    let wheres = compile_wheres(compiler, &update.wheres, &mut params)?;
    if !wheres.is_empty() {
        sql.push(' ');
        sql.push_str(&wheres);
    }

    Ok(CompiledStatement::with_params(sql, params))
}

/// Generate UPDATE SQL.
pub fn build_update(
    compiler: &OracleCompiler,
    update: &UpdateDescriptor,
) -> OracleResult<CompiledStatement> {
    compile_update_body(compiler, update, &[])
}

/// UPDATE setting every binary column to `EMPTY_BLOB()` and returning the
/// locators plus the key.
pub fn build_update_lob(
    compiler: &OracleCompiler,
    update: &UpdateDescriptor,
) -> OracleResult<CompiledStatement> {
    if update.binary_columns.is_empty() {
        return build_update(compiler, update);
    }

    let w = compiler.wrapper();
    let binary: Vec<&str> = update.binary_columns.iter().map(|(c, _)| c.as_str()).collect();
    let sets: Vec<String> = binary
        .iter()
        .map(|c| format!("{} = EMPTY_BLOB()", w.wrap(c)))
        .collect();

    let mut stmt = compile_update_body(compiler, update, &sets)?;

    let key = update.key_column();
    let mut returning = binary.clone();
    returning.push(key);
    stmt.sql.push_str(&format!(
        " returning {} into {}",
        w.columnize(&returning),
        vec!["?"; returning.len()].join(", ")
    ));
    stmt.outputs = binary.iter().map(|c| OutBinding::blob_locator(*c)).collect();
    stmt.outputs.push(OutBinding::key(key));
    Ok(stmt)
}
