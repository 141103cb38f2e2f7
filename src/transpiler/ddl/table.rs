use super::{bare_table, resolve_index_name};
use crate::ast::*;
use crate::error::{OracleError, OracleResult};
use crate::transpiler::OracleCompiler;
use crate::transpiler::types::column_definition;
use crate::transpiler::wrapper::quote_string;

/// `create table T ( cols[, constraint fk ...][, constraint pk ...] )`
///
/// Foreign keys and the first primary key are declared inline. A table
/// needs at least one column.
pub fn compile_create(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    commands: &[SchemaCommand],
) -> OracleResult<String> {
    if blueprint.added_columns().next().is_none() {
        return Err(OracleError::compile(format!(
            "create table {} has no columns",
            blueprint.name
        )));
    }

    let w = compiler.wrapper();
    let mut body: Vec<String> = blueprint
        .added_columns()
        .map(|c| column_definition(w, c))
        .collect();

    for command in commands {
        if let SchemaCommand::Foreign(foreign) = command {
            let index = IndexCommand {
                index: foreign.index.clone(),
                columns: foreign.columns.clone(),
            };
            let mut sql = format!(
                "constraint {} foreign key ( {} ) references {} ( {} )",
                resolve_index_name(compiler, blueprint, IndexKind::Foreign, &index),
                w.columnize(&foreign.columns),
                w.wrap_table(&foreign.on),
                w.columnize(&foreign.references)
            );
            if let Some(action) = &foreign.on_delete {
                sql.push_str(&format!(" on delete {}", action));
            }
            body.push(sql);
        }
    }

    if let Some(SchemaCommand::Primary(primary)) = commands
        .iter()
        .find(|c| matches!(c, SchemaCommand::Primary(_)))
    {
        body.push(format!(
            "constraint {} primary key ( {} )",
            resolve_index_name(compiler, blueprint, IndexKind::Primary, primary),
            w.columnize(&primary.columns)
        ));
    }

    tracing::info!("compiling create table {}", blueprint.name);
    Ok(format!(
        "create table {} ( {} )",
        w.wrap_table(&blueprint.name),
        body.join(", ")
    ))
}

/// `alter table T add ( col-def, ... )`
pub fn compile_add(compiler: &OracleCompiler, blueprint: &TableBlueprint) -> Option<String> {
    let w = compiler.wrapper();
    let columns: Vec<String> = blueprint
        .added_columns()
        .map(|c| column_definition(w, c))
        .collect();
    if columns.is_empty() {
        return None;
    }
    Some(format!(
        "alter table {} add ( {} )",
        w.wrap_table(&blueprint.name),
        columns.join(", ")
    ))
}

/// `alter table T modify col-def`, one statement per changed column.
/// `modify` needs the complete definition, not a diff.
pub fn compile_change(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
) -> OracleResult<Vec<String>> {
    let w = compiler.wrapper();
    let table = w.wrap_table(&blueprint.name);
    let statements: Vec<String> = blueprint
        .changed_columns()
        .map(|c| format!("alter table {} modify {}", table, column_definition(w, c)))
        .collect();

    if statements.is_empty() {
        return Err(OracleError::MissingChangeColumn {
            table: blueprint.name.clone(),
        });
    }
    Ok(statements)
}

pub fn compile_drop_columns(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    columns: &[String],
) -> String {
    let w = compiler.wrapper();
    format!(
        "alter table {} drop ( {} )",
        w.wrap_table(&blueprint.name),
        w.columnize(columns)
    )
}

/// `rename to` takes an unqualified name.
pub fn compile_rename(compiler: &OracleCompiler, blueprint: &TableBlueprint, to: &str) -> String {
    let w = compiler.wrapper();
    format!(
        "alter table {} rename to {}",
        w.wrap_table(&blueprint.name),
        w.wrap_value(&w.prefixed_table(to))
    )
}

pub fn compile_rename_column(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    from: &str,
    to: &str,
) -> String {
    let w = compiler.wrapper();
    format!(
        "alter table {} rename column {} to {}",
        w.wrap_table(&blueprint.name),
        w.wrap(from),
        w.wrap(to)
    )
}

pub fn compile_drop(compiler: &OracleCompiler, table: &str) -> String {
    format!("drop table {}", compiler.wrapper().wrap_table(table))
}

/// Drop that is a no-op when the table is missing, so it can be repeated.
pub fn compile_drop_if_exists(compiler: &OracleCompiler, table: &str) -> String {
    format!(
        "begin execute immediate 'drop table {}'; exception when others then null; end;",
        compiler.wrapper().wrap_table(table)
    )
}

/// Drop every user table (skipping secondary and IOT overflow segments),
/// then every user sequence.
pub fn build_drop_all_tables() -> String {
    "BEGIN \
FOR c IN (SELECT table_name FROM user_tables WHERE secondary = 'N' AND nvl(iot_type, 'X') != 'IOT_OVERFLOW') LOOP \
EXECUTE IMMEDIATE ('DROP TABLE \"' || c.table_name || '\" CASCADE CONSTRAINTS'); \
END LOOP; \
FOR s IN (SELECT sequence_name FROM user_sequences) LOOP \
EXECUTE IMMEDIATE ('DROP SEQUENCE ' || s.sequence_name); \
END LOOP; \
END;"
        .to_string()
}

/// Table comment first, then column comments in definition order.
pub fn compile_comments(compiler: &OracleCompiler, blueprint: &TableBlueprint) -> Vec<String> {
    let w = compiler.wrapper();
    let table = w.wrap_table(&blueprint.name);
    let mut statements = Vec::new();

    if let Some(comment) = &blueprint.comment {
        statements.push(format!(
            "comment on table {} is {}",
            table,
            quote_string(comment)
        ));
    }

    let column_comments = blueprint
        .added_columns()
        .chain(blueprint.changed_columns())
        .filter_map(|c| c.comment.as_ref().map(|text| (c.name.as_str(), text.as_str())))
        .chain(
            blueprint
                .column_comments
                .iter()
                .map(|(c, text)| (c.as_str(), text.as_str())),
        );

    for (column, comment) in column_comments {
        statements.push(format!(
            "comment on column {}.{} is {}",
            table,
            w.wrap_value(column),
            quote_string(comment)
        ));
    }

    if !statements.is_empty() {
        tracing::debug!(
            "{} comment statement(s) for {}",
            statements.len(),
            bare_table(&blueprint.name)
        );
    }
    statements
}
