use crate::ast::*;
use crate::error::OracleResult;
use crate::transpiler::conditions::compile_wheres;
use crate::transpiler::{CompiledStatement, OracleCompiler};

/// Generate DELETE SQL.
pub fn build_delete(
    compiler: &OracleCompiler,
    delete: &DeleteDescriptor,
) -> OracleResult<CompiledStatement> {
    let mut params = Vec::new();
    let mut sql = format!(
        "delete from {}",
        compiler.wrapper().wrap_table(&delete.table)
    );

    let wheres = compile_wheres(compiler, &delete.wheres, &mut params)?;
    if !wheres.is_empty() {
        sql.push(' ');
        sql.push_str(&wheres);
    }

    Ok(CompiledStatement::with_params(sql, params))
}

pub fn build_truncate(compiler: &OracleCompiler, table: &str) -> String {
    format!("truncate table {}", compiler.wrapper().wrap_table(table))
}
