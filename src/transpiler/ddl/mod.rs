//! DDL compilation for table blueprints.
//!
//! A blueprint compiles to an ordered statement list:
//! 1. Oracle Text preferences (must exist before the indexes using them)
//! 2. table DDL, one entry per command
//! 3. table and column comments
//! 4. the auto-increment sequence and trigger (must follow the table)

pub mod index;
pub mod introspect;
pub mod table;

use super::preferences::{self, PREFERENCE_SUFFIX};
use super::wrapper::shorten;
use super::{CompiledStatement, OracleCompiler};
use crate::ast::*;
use crate::error::OracleResult;

/// Unqualified table name of a blueprint.
pub(crate) fn bare_table(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Explicit index name, or one derived from table, columns and kind.
pub fn resolve_index_name(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    kind: IndexKind,
    index: &IndexCommand,
) -> String {
    let w = compiler.wrapper();
    match &index.index {
        Some(name) => w.shorten(name),
        None => w.index_name(bare_table(&blueprint.name), kind, &index.columns),
    }
}

/// Base name of a full-text index.
///
/// A multi-column index derives `<base>_<n>` index names and a
/// `<base>_preference` datastore, so its base is shortened far enough for
/// the preference name to fit the identifier limit.
pub fn fulltext_base(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    index: &IndexCommand,
) -> String {
    let name = resolve_index_name(compiler, blueprint, IndexKind::Fulltext, index);
    if index.columns.len() > 1 {
        let max_length = compiler
            .wrapper()
            .max_length()
            .saturating_sub(PREFERENCE_SUFFIX.len());
        shorten(&name, max_length)
    } else {
        name
    }
}

/// Commands implied by the blueprint's columns, merged with the explicit ones.
///
/// Altering an existing table gains leading `Add` / `Change` commands for
/// its column definitions. Column flags become index commands, and an
/// auto-increment integer column becomes the primary key unless one is
/// declared.
pub fn implied_commands(blueprint: &TableBlueprint) -> Vec<SchemaCommand> {
    let mut commands = Vec::with_capacity(blueprint.commands.len() + 2);

    if !blueprint.creating() {
        if blueprint.added_columns().next().is_some() {
            commands.push(SchemaCommand::Add);
        }
        if blueprint.changed_columns().next().is_some() {
            commands.push(SchemaCommand::Change);
        }
    }
    commands.extend(blueprint.commands.iter().cloned());

    let has_primary = commands
        .iter()
        .any(|c| matches!(c, SchemaCommand::Primary(_)));
    let mut primary_added = has_primary;

    for column in blueprint.added_columns() {
        let on = IndexCommand::on(&[column.name.as_str()]);
        if (column.primary || column.is_serial()) && !primary_added {
            commands.push(SchemaCommand::Primary(on.clone()));
            primary_added = true;
        }
        if column.unique {
            commands.push(SchemaCommand::Unique(on.clone()));
        }
        if column.index {
            commands.push(SchemaCommand::Index(on));
        }
    }
    commands
}

pub fn build_blueprint(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
) -> OracleResult<Vec<String>> {
    let mut statements = Vec::new();

    let prefs = preferences::collect(compiler, blueprint);
    if let Some(block) = preferences::compile_create(compiler, &prefs) {
        tracing::info!(
            "creating {} full-text preference(s) for {}",
            prefs.len(),
            blueprint.name
        );
        statements.push(block);
    }

    let commands = implied_commands(blueprint);
    for command in &commands {
        statements.extend(compile_command(compiler, blueprint, &commands, command)?);
    }

    statements.extend(table::compile_comments(compiler, blueprint));
    statements.extend(compiler.auto_increment().compile_create(blueprint));
    Ok(statements)
}

fn compile_command(
    compiler: &OracleCompiler,
    blueprint: &TableBlueprint,
    commands: &[SchemaCommand],
    command: &SchemaCommand,
) -> OracleResult<Vec<String>> {
    let creating = blueprint.creating();
    let sql = match command {
        SchemaCommand::Create => vec![table::compile_create(compiler, blueprint, commands)?],
        SchemaCommand::Add => table::compile_add(compiler, blueprint).into_iter().collect(),
        SchemaCommand::Change => table::compile_change(compiler, blueprint)?,
        SchemaCommand::Drop => vec![table::compile_drop(compiler, &blueprint.name)],
        SchemaCommand::DropIfExists => {
            vec![table::compile_drop_if_exists(compiler, &blueprint.name)]
        }
        SchemaCommand::DropColumn(columns) => {
            vec![table::compile_drop_columns(compiler, blueprint, columns)]
        }
        SchemaCommand::Rename { to } => vec![table::compile_rename(compiler, blueprint, to)],
        SchemaCommand::RenameColumn { from, to } => {
            vec![table::compile_rename_column(compiler, blueprint, from, to)]
        }
        // inline in `create table`
        SchemaCommand::Primary(_) | SchemaCommand::Foreign(_) if creating => Vec::new(),
        SchemaCommand::Primary(index) => vec![index::compile_primary(compiler, blueprint, index)],
        SchemaCommand::Foreign(foreign) => {
            vec![index::compile_foreign(compiler, blueprint, foreign)]
        }
        SchemaCommand::Unique(index) => vec![index::compile_unique(compiler, blueprint, index)],
        SchemaCommand::Index(index) => vec![index::compile_index(compiler, blueprint, index)],
        SchemaCommand::Fulltext(index) => {
            vec![index::compile_fulltext(compiler, blueprint, index)]
        }
        SchemaCommand::DropPrimary(index) => vec![index::compile_drop_constraint(
            compiler,
            blueprint,
            IndexKind::Primary,
            index,
        )],
        SchemaCommand::DropUnique(index) => vec![index::compile_drop_constraint(
            compiler,
            blueprint,
            IndexKind::Unique,
            index,
        )],
        SchemaCommand::DropForeign(index) => vec![index::compile_drop_constraint(
            compiler,
            blueprint,
            IndexKind::Foreign,
            index,
        )],
        SchemaCommand::DropIndex(index) => {
            vec![index::compile_drop_index(compiler, blueprint, IndexKind::Index, index)]
        }
        SchemaCommand::DropFullText(index) => {
            vec![index::compile_drop_fulltext(compiler, blueprint, index)]
        }
    };
    Ok(sql)
}

/// Statements dropping a table and everything created with it:
/// sequence and trigger (when the primary key is known), Oracle Text
/// preferences, then the table.
pub fn build_drop_plan(
    compiler: &OracleCompiler,
    table: &str,
    primary_key: Option<&str>,
    if_exists: bool,
) -> Vec<CompiledStatement> {
    let mut plan = Vec::new();
    if let Some(column) = primary_key {
        plan.extend(
            compiler
                .auto_increment()
                .compile_drop(table, column)
                .into_iter()
                .map(CompiledStatement::new),
        );
    }
    plan.push(preferences::compile_drop_by_table(compiler, table));
    plan.push(CompiledStatement::new(if if_exists {
        table::compile_drop_if_exists(compiler, table)
    } else {
        table::compile_drop(compiler, table)
    }));
    plan
}
