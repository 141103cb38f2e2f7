//! Auto-increment emulation with a sequence and a `before insert` trigger.
//!
//! Object names are derived from table and column alone, so a later drop
//! that only knows the table can rebuild them once the primary key column
//! has been looked up in the data dictionary.

use super::wrapper::Wrapper;
use super::{CompiledStatement, sequence, trigger};
use crate::ast::{SequenceSpec, TableBlueprint, TriggerSpec, Value};

/// Data-dictionary lookup of a table's first primary key column.
pub const PRIMARY_KEY_LOOKUP: &str = "SELECT cols.column_name FROM all_constraints cons, all_cons_columns cols \
WHERE upper(cols.table_name) = upper(?) AND cons.constraint_type = 'P' \
AND cons.constraint_name = cols.constraint_name AND cons.owner = cols.owner \
AND cols.position = 1 AND cons.owner = (select user from dual)";

pub struct AutoIncrement<'a> {
    wrapper: &'a Wrapper,
}

impl<'a> AutoIncrement<'a> {
    pub fn new(wrapper: &'a Wrapper) -> Self {
        Self { wrapper }
    }

    pub fn sequence_name(&self, table: &str, column: &str) -> String {
        self.wrapper.object_name(table, column, "seq")
    }

    pub fn trigger_name(&self, table: &str, column: &str) -> String {
        self.wrapper.object_name(table, column, "trg")
    }

    /// Sequence and trigger for the blueprint's auto-increment column, if any.
    pub fn plan(&self, blueprint: &TableBlueprint) -> Option<(SequenceSpec, TriggerSpec)> {
        let column = blueprint.serial_column()?;
        let sequence_name = self.sequence_name(&blueprint.name, &column.name);

        let mut sequence = SequenceSpec::new(&sequence_name);
        if let Some(start) = column.start_value {
            sequence = sequence.start_with(start);
        }
        if column.nocache {
            sequence = sequence.nocache();
        }

        let trigger = TriggerSpec {
            name: self.trigger_name(&blueprint.name, &column.name),
            table: blueprint.name.clone(),
            column: column.name.clone(),
            sequence_name,
        };
        Some((sequence, trigger))
    }

    /// `create sequence` then `create trigger`; both must follow `create table`.
    pub fn compile_create(&self, blueprint: &TableBlueprint) -> Vec<String> {
        match self.plan(blueprint) {
            Some((seq, trg)) => {
                tracing::info!(
                    "emulating auto-increment on {}.{} with {}",
                    blueprint.name,
                    trg.column,
                    seq.name
                );
                vec![
                    sequence::compile_create(self.wrapper, &seq),
                    trigger::compile_auto_increment(self.wrapper, &trg),
                ]
            }
            None => Vec::new(),
        }
    }

    /// Drop the pair re-derived from the primary key found at drop time.
    pub fn compile_drop(&self, table: &str, primary_key: &str) -> Vec<String> {
        vec![
            sequence::compile_drop(self.wrapper, &self.sequence_name(table, primary_key)),
            trigger::compile_drop(self.wrapper, &self.trigger_name(table, primary_key)),
        ]
    }

    pub fn primary_key_lookup(&self, table: &str) -> CompiledStatement {
        CompiledStatement::with_params(
            PRIMARY_KEY_LOOKUP,
            vec![Value::String(self.wrapper.prefixed_table(table))],
        )
    }
}
