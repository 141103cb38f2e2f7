use crate::ast::*;
use crate::error::{OracleError, OracleResult};
use crate::transpiler::wrapper::parameterize;
use crate::transpiler::{CompiledStatement, OracleCompiler};

/// Column names of the first row, and every row's values reordered to match.
fn normalize_rows(rows: &[Row]) -> OracleResult<(Vec<String>, Vec<Vec<Value>>)> {
    let Some(first) = rows.first() else {
        return Err(OracleError::EmptyInsert);
    };
    let columns: Vec<String> = first.iter().map(|(c, _)| c.clone()).collect();

    let mut values = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let mismatch = || OracleError::ColumnMismatch {
            row: index,
            expected: columns.join(", "),
            found: row.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>().join(", "),
        };
        if row.len() != columns.len() {
            return Err(mismatch());
        }
        let mut ordered = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row
                .iter()
                .find(|(c, _)| c == column)
                .map(|(_, v)| v.clone())
                .ok_or_else(mismatch)?;
            ordered.push(value);
        }
        values.push(ordered);
    }
    Ok((columns, values))
}

fn bindable(values: &[Value]) -> impl Iterator<Item = Value> + '_ {
    values.iter().filter(|v| !v.is_raw()).cloned()
}

/// Generate INSERT SQL.
///
/// One row compiles to `values (...)`. Several rows become one
/// `select ... from dual` branch per row joined by `union all`, since
/// Oracle has no multi-row `values`.
pub fn build_insert(
    compiler: &OracleCompiler,
    insert: &InsertDescriptor,
) -> OracleResult<CompiledStatement> {
    let (columns, rows) = normalize_rows(&insert.rows)?;
    if columns.is_empty() {
        return Err(OracleError::compile(format!(
            "insert into '{}' has no columns",
            insert.table
        )));
    }

    let w = compiler.wrapper();
    let table = w.wrap_table(&insert.table);
    let columns = w.columnize(&columns);
    let params: Vec<Value> = rows.iter().flat_map(|row| bindable(row)).collect();

    let sql = if rows.len() == 1 {
        format!(
            "insert into {} ({}) values ({})",
            table,
            columns,
            parameterize(&rows[0])
        )
    } else {
        let selects: Vec<String> = rows
            .iter()
            .map(|row| format!("select {} from dual", parameterize(row)))
            .collect();
        format!(
            "insert into {} ({}) {}",
            table,
            columns,
            selects.join(" union all ")
        )
    };

    Ok(CompiledStatement::with_params(sql, params))
}

/// INSERT with ` returning KEY into ?`, unless the row already has the key.
pub fn build_insert_get_id(
    compiler: &OracleCompiler,
    insert: &InsertDescriptor,
) -> OracleResult<CompiledStatement> {
    if insert.rows.len() > 1 {
        return Err(OracleError::compile(
            "returning a generated key requires a single row",
        ));
    }

    let mut stmt = build_insert(compiler, insert)?;
    if insert.has_explicit_key() {
        return Ok(stmt);
    }

    let key = insert.key_column();
    stmt.sql.push_str(&format!(
        " returning {} into ?",
        compiler.wrapper().wrap(key)
    ));
    stmt.outputs.push(OutBinding::key(key));
    Ok(stmt)
}

/// INSERT writing `EMPTY_BLOB()` for every binary column and returning the
/// locators plus the key.
pub fn build_insert_lob(
    compiler: &OracleCompiler,
    insert: &InsertDescriptor,
) -> OracleResult<CompiledStatement> {
    if insert.rows.len() > 1 {
        return Err(OracleError::compile("LOB inserts take a single row"));
    }
    if insert.binary_columns.is_empty() {
        return build_insert_get_id(compiler, insert);
    }

    let (mut columns, rows) = if insert.rows.is_empty() {
        (Vec::new(), vec![Vec::new()])
    } else {
        normalize_rows(&insert.rows)?
    };
    let row = &rows[0];

    let w = compiler.wrapper();
    let binary: Vec<&str> = insert.binary_columns.iter().map(|(c, _)| c.as_str()).collect();
    let key = insert.key_column();

    let mut placeholders: Vec<&str> = row.iter().map(Value::placeholder).collect();
    placeholders.extend(binary.iter().map(|_| "EMPTY_BLOB()"));
    columns.extend(binary.iter().map(|c| c.to_string()));

    let mut returning: Vec<&str> = binary.clone();
    returning.push(key);
    let into = vec!["?"; returning.len()].join(", ");

    let sql = format!(
        "insert into {} ({}) values ({}) returning {} into {}",
        w.wrap_table(&insert.table),
        w.columnize(&columns),
        placeholders.join(", "),
        w.columnize(&returning),
        into
    );

    let mut stmt = CompiledStatement::with_params(sql, bindable(row).collect());
    stmt.outputs = binary.iter().map(|c| OutBinding::blob_locator(*c)).collect();
    stmt.outputs.push(OutBinding::key(key));
    Ok(stmt)
}
