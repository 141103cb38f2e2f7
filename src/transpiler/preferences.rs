//! Oracle Text preferences for multi-column full-text indexes.
//!
//! A full-text index over several columns needs a `MULTI_COLUMN_DATASTORE`
//! preference named `<index>_preference`, created before the index itself.
//! Single-column indexes use the default datastore and get none.

use super::CompiledStatement;
use super::OracleCompiler;
use super::ddl::fulltext_base;
use crate::ast::{FullTextPreference, SchemaCommand, TableBlueprint, Value};

pub const PREFERENCE_SUFFIX: &str = "_preference";

pub fn preference_name(index: &str) -> String {
    format!("{}{}", index, PREFERENCE_SUFFIX)
}

/// Preferences required by the blueprint's multi-column full-text commands.
pub fn collect(compiler: &OracleCompiler, blueprint: &TableBlueprint) -> Vec<FullTextPreference> {
    blueprint
        .commands
        .iter()
        .filter_map(|command| match command {
            SchemaCommand::Fulltext(index) if index.columns.len() > 1 => Some(FullTextPreference {
                name: preference_name(&fulltext_base(compiler, blueprint, index)),
                columns: index.columns.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// One PL/SQL block creating every preference, or `None` when there are none.
pub fn compile_create(
    compiler: &OracleCompiler,
    preferences: &[FullTextPreference],
) -> Option<String> {
    if preferences.is_empty() {
        return None;
    }

    let statements: Vec<String> = preferences
        .iter()
        .map(|pref| {
            format!(
                "ctx_ddl.create_preference('{name}', 'MULTI_COLUMN_DATASTORE'); \
                 ctx_ddl.set_attribute('{name}', 'COLUMNS', '{columns}');",
                name = pref.name,
                columns = compiler.wrapper().columnize(&pref.columns),
            )
        })
        .collect();

    Some(format!("BEGIN {} END;", statements.join(" ")))
}

/// Drop the preferences behind every Oracle Text index on a table.
///
/// Names are recovered from the index names by cutting the trailing
/// `_<n>` and appending the preference suffix; only names that exist in
/// `ctx_user_preferences` are dropped.
pub fn compile_drop_by_table(compiler: &OracleCompiler, table: &str) -> CompiledStatement {
    let sql = "BEGIN \
FOR c IN (select distinct (substr(cui.idx_name, 1, instr(cui.idx_name, '_', -1, 1) - 1) || '_preference') preference \
from ctx_user_indexes cui where cui.idx_table = upper(?)) LOOP \
FOR p IN (select pre_name from ctx_user_preferences where upper(pre_name) = upper(c.preference)) LOOP \
EXECUTE IMMEDIATE 'CALL CTXSYS.CTX_DDL.DROP_PREFERENCE(:preference)' USING p.pre_name; \
END LOOP; \
END LOOP; \
END;";
    CompiledStatement::with_params(
        sql,
        vec![Value::String(compiler.wrapper().prefixed_table(table))],
    )
}

/// Drop every preference owned by the user. Environment teardown only.
pub fn compile_drop_all() -> String {
    "BEGIN \
FOR c IN (select pre_name from ctx_user_preferences) LOOP \
EXECUTE IMMEDIATE 'CALL CTXSYS.CTX_DDL.DROP_PREFERENCE(:pre_name)' USING c.pre_name; \
END LOOP; \
END;"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::IndexCommand;

    #[test]
    fn test_only_multi_column_indexes_need_preferences() {
        let compiler = OracleCompiler::default();
        let blueprint = TableBlueprint::create("articles")
            .command(SchemaCommand::Fulltext(IndexCommand::on(&["title"])))
            .command(SchemaCommand::Fulltext(IndexCommand::on(&["title", "body"])));

        let prefs = collect(&compiler, &blueprint);
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].name, "arti_titl_body_full_preference");

        let sql = compile_create(&compiler, &prefs).unwrap();
        assert_eq!(
            sql,
            "BEGIN ctx_ddl.create_preference('arti_titl_body_full_preference', 'MULTI_COLUMN_DATASTORE'); \
             ctx_ddl.set_attribute('arti_titl_body_full_preference', 'COLUMNS', 'title, body'); END;"
        );
        assert!(compile_create(&compiler, &[]).is_none());
    }

    #[test]
    fn test_drop_by_table_binds_table() {
        let compiler = OracleCompiler::default();
        let stmt = compile_drop_by_table(&compiler, "articles");
        assert!(stmt.sql.contains("ctx_user_indexes"));
        assert!(stmt.sql.contains("DROP_PREFERENCE"));
        assert_eq!(stmt.params, vec![Value::from("articles")]);
        assert!(compile_drop_all().contains("ctx_user_preferences"));
    }
}
