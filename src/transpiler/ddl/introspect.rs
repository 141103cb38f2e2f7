//! Data-dictionary queries.
//!
//! Owner and table names are always compared through `upper(...)`, and
//! result columns carry quoted lower-case aliases so rows come back keyed
//! the same way regardless of driver.

use crate::ast::Value;
use crate::transpiler::wrapper::quote_string;
use crate::transpiler::{CompiledStatement, OracleCompiler};

fn owner_and_table(compiler: &OracleCompiler, schema: &str, table: &str) -> Vec<Value> {
    vec![
        Value::from(schema),
        Value::String(compiler.wrapper().prefixed_table(table)),
    ]
}

/// Binds: owner, table.
pub fn table_exists(compiler: &OracleCompiler, schema: &str, table: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select * from all_tables where upper(owner) = upper(?) and upper(table_name) = upper(?)",
        owner_and_table(compiler, schema, table),
    )
}

/// Binds: owner, table.
pub fn column_listing(compiler: &OracleCompiler, schema: &str, table: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select column_name as \"column_name\" from all_tab_cols \
         where upper(owner) = upper(?) and upper(table_name) = upper(?) order by column_id",
        owner_and_table(compiler, schema, table),
    )
}

/// Binds: owner, table, column.
pub fn column_exists(
    compiler: &OracleCompiler,
    schema: &str,
    table: &str,
    column: &str,
) -> CompiledStatement {
    let mut params = owner_and_table(compiler, schema, table);
    params.push(Value::from(column));
    CompiledStatement::with_params(
        "select count(*) as \"count\" from all_tab_cols \
         where upper(owner) = upper(?) and upper(table_name) = upper(?) and upper(column_name) = upper(?)",
        params,
    )
}

/// Binds: owner, table.
pub fn columns(compiler: &OracleCompiler, schema: &str, table: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select t.column_name as \"name\", nvl(t.data_type_mod, t.data_type) as \"type_name\", \
         t.data_type as \"type\", t.data_length as \"data_length\", t.char_length as \"char_length\", \
         t.data_precision as \"precision\", t.data_scale as \"places\", \
         decode(t.nullable, 'Y', 1, 0) as \"nullable\", t.data_default as \"default\", \
         c.comments as \"comment\" \
         from all_tab_cols t \
         left join all_col_comments c on t.owner = c.owner and t.table_name = c.table_name \
         and t.column_name = c.column_name \
         where upper(t.owner) = upper(?) and upper(t.table_name) = upper(?) and t.hidden_column = 'NO' \
         order by t.column_id",
        owner_and_table(compiler, schema, table),
    )
}

/// One row per indexed column. Binds: owner, table.
pub fn indexes(compiler: &OracleCompiler, schema: &str, table: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select i.index_name as \"name\", i.column_name as \"column_name\", \
         a.index_type as \"type\", decode(a.uniqueness, 'UNIQUE', 1, 0) as \"unique\", \
         decode(c.constraint_type, 'P', 1, 0) as \"primary\" \
         from all_ind_columns i \
         join all_indexes a on a.index_name = i.index_name and a.owner = i.index_owner \
         left join all_constraints c on c.index_name = a.index_name and c.owner = a.owner \
         and c.constraint_type = 'P' \
         where upper(i.table_owner) = upper(?) and upper(i.table_name) = upper(?) \
         order by i.index_name, i.column_position",
        owner_and_table(compiler, schema, table),
    )
}

/// Binds: owner, table.
pub fn foreign_keys(compiler: &OracleCompiler, schema: &str, table: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select kc.constraint_name as \"name\", \
         listagg(kc.column_name, ',') within group (order by kc.position) as \"columns\", \
         rc.r_owner as \"foreign_schema\", kcr.table_name as \"foreign_table\", \
         listagg(kcr.column_name, ',') within group (order by kcr.position) as \"foreign_columns\", \
         rc.delete_rule as \"on_delete\" \
         from all_cons_columns kc \
         inner join all_constraints rc on kc.constraint_name = rc.constraint_name and kc.owner = rc.owner \
         inner join all_cons_columns kcr on kcr.constraint_name = rc.r_constraint_name \
         and kcr.owner = rc.r_owner and kcr.position = kc.position \
         where upper(rc.owner) = upper(?) and upper(kc.table_name) = upper(?) and rc.constraint_type = 'R' \
         group by kc.constraint_name, rc.r_owner, kcr.table_name, rc.delete_rule",
        owner_and_table(compiler, schema, table),
    )
}

/// Binds: owner, owner.
pub fn tables(schema: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select lower(all_tables.table_name) as \"name\", lower(all_tables.owner) as \"schema\", \
         sum(user_segments.bytes) as \"size\", all_tab_comments.comments as \"comment\", \
         (select lower(value) from nls_database_parameters where parameter = 'NLS_SORT') as \"collation\" \
         from all_tables \
         join all_tab_comments on all_tab_comments.table_name = all_tables.table_name \
         and all_tab_comments.owner = all_tables.owner \
         left join user_segments on user_segments.segment_name = all_tables.table_name \
         where upper(all_tables.owner) = upper(?) and upper(all_tab_comments.owner) = upper(?) \
         and all_tables.iot_name is null \
         group by all_tables.table_name, all_tables.owner, all_tab_comments.comments \
         order by all_tables.table_name",
        vec![Value::from(schema), Value::from(schema)],
    )
}

/// Enable or disable every foreign key owned by `owner`.
pub fn toggle_foreign_keys(owner: &str, enable: bool) -> String {
    let action = if enable { "enable" } else { "disable" };
    format!(
        "begin for s in (select 'alter table ' || c.owner || '.' || c.table_name || ' {} constraint ' \
         || c.constraint_name as statement from all_constraints c \
         where c.constraint_type = 'R' and upper(c.owner) = upper({})) loop \
         execute immediate s.statement; end loop; end;",
        action,
        quote_string(owner)
    )
}
