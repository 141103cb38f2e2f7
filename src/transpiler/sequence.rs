//! Sequence DDL and value queries.

use super::CompiledStatement;
use super::wrapper::Wrapper;
use crate::ast::{SequenceSpec, Value};

/// Oracle error raised when dropping a sequence that does not exist.
pub const SEQUENCE_NOT_FOUND: &str = "-02289";

/// `create sequence S minvalue 1 [maxvalue M] start with N increment by 1 [nocache]`
pub fn compile_create(wrapper: &Wrapper, spec: &SequenceSpec) -> String {
    let mut parts = vec![
        format!("create sequence {}", wrapper.qualify(&spec.name)),
        format!("minvalue {}", spec.min_value),
    ];
    if let Some(max) = spec.max_value {
        parts.push(format!("maxvalue {}", max));
    }
    parts.push(format!("start with {}", spec.start_value));
    parts.push(format!("increment by {}", spec.increment_by));
    if spec.nocache {
        parts.push("nocache".to_string());
    }
    parts.join(" ")
}

/// Drop that swallows only ORA-02289.
pub fn compile_drop(wrapper: &Wrapper, name: &str) -> String {
    format!(
        "declare e exception; pragma exception_init(e,{}); \
         begin execute immediate 'drop sequence {}'; \
         exception when e then null; end;",
        SEQUENCE_NOT_FOUND,
        wrapper.qualify(name)
    )
}

pub fn compile_exists(name: &str) -> CompiledStatement {
    CompiledStatement::with_params(
        "select * from all_sequences where sequence_name = upper(?) and sequence_owner = upper(user)",
        vec![Value::from(name)],
    )
}

/// `select S.nextval as "id" from dual`
pub fn compile_next_value(wrapper: &Wrapper, name: &str) -> String {
    format!("select {}.nextval as \"id\" from dual", wrapper.qualify(name))
}

/// `select S.currval as "id" from dual`, the last value drawn in this session.
pub fn compile_current_value(wrapper: &Wrapper, name: &str) -> String {
    format!("select {}.currval as \"id\" from dual", wrapper.qualify(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OracleConfig;

    #[test]
    fn test_create_sequence() {
        let w = Wrapper::new(&OracleConfig::default());
        assert_eq!(
            compile_create(&w, &SequenceSpec::new("users_id_seq")),
            "create sequence users_id_seq minvalue 1 start with 1 increment by 1"
        );
        assert_eq!(
            compile_create(
                &w,
                &SequenceSpec::new("users_id_seq")
                    .start_with(100)
                    .max_value(999_999)
                    .nocache()
            ),
            "create sequence users_id_seq minvalue 1 maxvalue 999999 start with 100 increment by 1 nocache"
        );
    }

    #[test]
    fn test_drop_sequence_swallows_only_missing() {
        let w = Wrapper::new(&OracleConfig::default());
        let sql = compile_drop(&w, "users_id_seq");
        assert_eq!(
            sql,
            "declare e exception; pragma exception_init(e,-02289); \
             begin execute immediate 'drop sequence users_id_seq'; \
             exception when e then null; end;"
        );
        assert!(!sql.contains("when others"));
    }

    #[test]
    fn test_value_queries() {
        let config = OracleConfig {
            schema_prefix: Some("hr".into()),
            ..Default::default()
        };
        let w = Wrapper::new(&config);
        assert_eq!(
            compile_next_value(&w, "users_id_seq"),
            "select hr.users_id_seq.nextval as \"id\" from dual"
        );
        assert_eq!(
            compile_current_value(&w, "users_id_seq"),
            "select hr.users_id_seq.currval as \"id\" from dual"
        );
        assert_eq!(compile_exists("users_id_seq").params, vec![Value::from("users_id_seq")]);
    }
}
