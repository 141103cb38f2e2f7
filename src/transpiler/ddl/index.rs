//! Index and constraint DDL, including Oracle Text indexes.

use super::{fulltext_base, resolve_index_name};
use crate::ast::*;
use crate::transpiler::OracleCompiler;
use crate::transpiler::preferences::preference_name;

/// `alter table T add constraint IDX primary key (cols)`, for existing tables.
pub fn compile_primary(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    let w = compiler.wrapper();
    format!(
        "alter table {} add constraint {} primary key ({})",
        w.wrap_table(&blueprint.name),
        resolve_index_name(compiler, blueprint, IndexKind::Primary, index),
        w.columnize(&index.columns)
    )
}

pub fn compile_foreign(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    foreign: &ForeignKeyCommand,
) -> String {
    let w = compiler.wrapper();
    let index = IndexCommand {
        index: foreign.index.clone(),
        columns: foreign.columns.clone(),
    };
    let mut sql = format!(
        "alter table {} add constraint {} foreign key ( {} ) references {} ( {} )",
        w.wrap_table(&blueprint.name),
        resolve_index_name(compiler, blueprint, IndexKind::Foreign, &index),
        w.columnize(&foreign.columns),
        w.wrap_table(&foreign.on),
        w.columnize(&foreign.references)
    );
    if let Some(action) = &foreign.on_delete {
        sql.push_str(&format!(" on delete {}", action));
    }
    sql
}

pub fn compile_unique(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    let w = compiler.wrapper();
    format!(
        "alter table {} add constraint {} unique ( {} )",
        w.wrap_table(&blueprint.name),
        resolve_index_name(compiler, blueprint, IndexKind::Unique, index),
        w.columnize(&index.columns)
    )
}

pub fn compile_index(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    let w = compiler.wrapper();
    format!(
        "create index {} on {} ( {} )",
        resolve_index_name(compiler, blueprint, IndexKind::Index, index),
        w.wrap_table(&blueprint.name),
        w.columnize(&index.columns)
    )
}

/// One `ctxsys.context` index per column, in a single PL/SQL block.
///
/// With several columns each index is suffixed `_<n>` and reads through the
/// `<index>_preference` multi-column datastore, which must already exist.
pub fn compile_fulltext(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    let w = compiler.wrapper();
    let table = w.wrap_table(&blueprint.name);
    let base = fulltext_base(compiler, blueprint, index);
    let multi = index.columns.len() > 1;

    let statements: Vec<String> = index
        .columns
        .iter()
        .enumerate()
        .map(|(n, column)| {
            let (name, datastore) = if multi {
                (
                    format!("{}_{}", base, n),
                    format!("datastore {} ", preference_name(&base)),
                )
            } else {
                (base.clone(), String::new())
            };
            format!(
                "execute immediate 'create index {} on {} ({}) indextype is ctxsys.context parameters (''{}sync(on commit)'')';",
                name,
                table,
                w.wrap(column),
                datastore
            )
        })
        .collect();

    format!("begin {} end;", statements.join(" "))
}

/// `alter table T drop constraint IDX`
pub fn compile_drop_constraint(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    kind: IndexKind,
    index: &IndexCommand,
) -> String {
    format!(
        "alter table {} drop constraint {}",
        compiler.wrapper().wrap_table(&blueprint.name),
        resolve_index_name(compiler, blueprint, kind, index)
    )
}

/// `drop index IDX`
pub fn compile_drop_index(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    kind: IndexKind,
    index: &IndexCommand,
) -> String {
    format!(
        "drop index {}",
        resolve_index_name(compiler, blueprint, kind, index)
    )
}

/// Drop the Oracle Text indexes built on the given columns of this table,
/// or fall back to a plain `drop index` when only the name is known.
pub fn compile_drop_fulltext(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    if index.columns.is_empty() {
        return compile_drop_index(compiler, blueprint, IndexKind::Fulltext, index);
    }

    let columns = index
        .columns
        .iter()
        .map(|c| format!("'{}'", c.to_uppercase().replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ");
    let table = compiler
        .wrapper()
        .prefixed_table(&blueprint.name)
        .to_uppercase()
        .replace('\'', "''");

    format!(
        "begin for idx_rec in (select idx_name from ctx_user_indexes \
         where idx_table = '{}' and idx_text_name in ({})) loop \
         execute immediate 'drop index ' || idx_rec.idx_name; end loop; end;",
        table, columns
    )
}
