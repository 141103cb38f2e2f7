//! Trigger DDL.

use super::CompiledStatement;
use super::wrapper::Wrapper;
use crate::ast::{TriggerSpec, Value};

/// Oracle error raised when dropping a trigger that does not exist.
pub const TRIGGER_NOT_FOUND: &str = "-4080";

/// `before insert` row trigger drawing the column from its sequence when null.
pub fn compile_auto_increment(wrapper: &Wrapper, spec: &TriggerSpec) -> String {
    let column = wrapper.wrap_value(&spec.column);
    format!(
        "create trigger {trigger} before insert on {table} for each row \
         begin if :new.{column} is null then \
         select {sequence}.nextval into :new.{column} from dual; \
         end if; end;",
        trigger = wrapper.qualify(&spec.name),
        table = wrapper.wrap_table(&spec.table),
        column = column,
        sequence = wrapper.qualify(&spec.sequence_name),
    )
}

/// Drop that swallows only ORA-04080.
pub fn compile_drop(wrapper: &Wrapper, name: &str) -> String {
    format!(
        "declare e exception; pragma exception_init(e,{}); \
         begin execute immediate 'drop trigger {}'; \
         exception when e then null; end;",
        TRIGGER_NOT_FOUND,
        wrapper.qualify(name)
    )
}

pub fn compile_exists(name: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select * from all_triggers where trigger_name = upper(?) and owner = upper(user)",
        vec![Value::from(name)],
    )
}
