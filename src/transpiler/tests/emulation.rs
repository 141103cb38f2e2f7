//! Auto-increment emulation across create and drop.

use crate::ast::*;
use crate::config::OracleConfig;
use crate::transpiler::{OracleCompiler, SqlCompiler};

fn count_prefix(statements: &[String], prefix: &str) -> usize {
    statements.iter().filter(|s| s.starts_with(prefix)).count()
}

#[test]
fn test_one_sequence_and_trigger_after_create() {
    let blueprint = TableBlueprint::create("orders")
        .column(
            ColumnDefinition::new("id", ColumnType::BigInteger)
                .auto_increment()
                .primary(),
        )
        .column(ColumnDefinition::new("total", ColumnType::Decimal).precision(12, 2));

    let statements = OracleCompiler::default().compile_blueprint(&blueprint).unwrap();
    assert_eq!(count_prefix(&statements, "create sequence"), 1);
    assert_eq!(count_prefix(&statements, "create trigger"), 1);

    let table = statements
        .iter()
        .position(|s| s.starts_with("create table"))
        .unwrap();
    let sequence = statements
        .iter()
        .position(|s| s.starts_with("create sequence"))
        .unwrap();
    let trigger = statements
        .iter()
        .position(|s| s.starts_with("create trigger"))
        .unwrap();
    assert!(table < sequence && sequence < trigger);
    assert_eq!(
        statements[trigger],
        "create trigger orders_id_trg before insert on orders for each row \
         begin if :new.id is null then \
         select orders_id_seq.nextval into :new.id from dual; \
         end if; end;"
    );
    // a single primary key, declared inline
    assert_eq!(statements[table].matches("primary key").count(), 1);
}

#[test]
fn test_start_value_and_nocache() {
    let mut id = ColumnDefinition::new("id", ColumnType::Integer).auto_increment();
    id.start_value = Some(1000);
    id.nocache = true;
    let blueprint = TableBlueprint::create("invoices").column(id);

    let statements = OracleCompiler::default().compile_blueprint(&blueprint).unwrap();
    assert_eq!(
        statements[1],
        "create sequence invoices_id_seq minvalue 1 start with 1000 increment by 1 nocache"
    );
}

#[test]
fn test_adding_serial_column_to_existing_table() {
    let blueprint = TableBlueprint::new("legacy")
        .column(ColumnDefinition::new("row_id", ColumnType::Integer).auto_increment());
    let statements = OracleCompiler::default().compile_blueprint(&blueprint).unwrap();
    assert_eq!(
        statements[..2].to_vec(),
        vec![
            "alter table legacy add ( row_id number(10,0) not null )",
            "alter table legacy add constraint legacy_row_id_pk primary key (row_id)",
        ]
    );
    assert!(statements[2].starts_with("create sequence legacy_row_id_seq"));
    assert!(statements[3].starts_with("create trigger legacy_row_id_trg"));
}

#[test]
fn test_non_integer_auto_increment_is_ignored() {
    let blueprint = TableBlueprint::create("codes")
        .column(ColumnDefinition::new("code", ColumnType::String).auto_increment());
    let statements = OracleCompiler::default().compile_blueprint(&blueprint).unwrap();
    assert_eq!(statements.len(), 1);
    assert!(!statements[0].contains("primary key"));
}

#[test]
fn test_drop_rederives_names_from_primary_key() {
    let compiler = OracleCompiler::default();
    let blueprint = TableBlueprint::create("orders")
        .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment());
    let created = compiler.compile_blueprint(&blueprint).unwrap();

    let lookup = compiler.compile_primary_key_lookup("orders");
    assert_eq!(lookup.params, vec![Value::from("orders")]);

    let plan = compiler.compile_drop_table("orders", Some("id"), false);
    assert_eq!(plan.len(), 4);
    assert!(plan[0].sql.contains("'drop sequence orders_id_seq'"));
    assert!(plan[0].sql.contains("pragma exception_init(e,-02289)"));
    assert!(plan[1].sql.contains("'drop trigger orders_id_trg'"));
    assert!(plan[1].sql.contains("pragma exception_init(e,-4080)"));
    assert!(plan[2].sql.contains("DROP_PREFERENCE"));
    assert_eq!(plan[3].sql, "drop table orders");

    assert!(created.iter().any(|s| s.starts_with("create sequence orders_id_seq ")));
    assert!(created.iter().any(|s| s.starts_with("create trigger orders_id_trg ")));
}

#[test]
fn test_derived_names_respect_identifier_limit() {
    let blueprint = TableBlueprint::create("customer_subscription_events").column(
        ColumnDefinition::new("event_identifier", ColumnType::BigInteger).auto_increment(),
    );

    let short = OracleCompiler::default();
    let statements = short.compile_blueprint(&blueprint).unwrap();
    let auto = short.auto_increment();
    let sequence = auto.sequence_name("customer_subscription_events", "event_identifier");
    let trigger = auto.trigger_name("customer_subscription_events", "event_identifier");
    assert!(sequence.len() <= 30 && trigger.len() <= 30);
    assert!(statements.iter().any(|s| s.contains(&format!("create sequence {} ", sequence))));

    let plan = short.compile_drop_table("customer_subscription_events", Some("event_identifier"), true);
    assert!(plan[0].sql.contains(&sequence));
    assert!(plan[1].sql.contains(&trigger));

    let config = OracleConfig::builder().max_identifier_length(128).build().unwrap();
    let long = OracleCompiler::new(config);
    assert_eq!(
        long.auto_increment()
            .sequence_name("customer_subscription_events", "event_identifier"),
        "customer_subscription_events_event_identifier_seq"
    );
}

#[test]
fn test_schema_prefix_qualifies_sequence_and_trigger() {
    let config = OracleConfig::builder().schema_prefix("hr").build().unwrap();
    let compiler = OracleCompiler::new(config);
    let blueprint = TableBlueprint::create("users")
        .column(ColumnDefinition::new("id", ColumnType::Integer).auto_increment());
    let statements = compiler.compile_blueprint(&blueprint).unwrap();

    assert!(statements[0].starts_with("create table hr.users ("));
    assert!(statements[1].starts_with("create sequence hr.users_id_seq "));
    assert!(statements[2].starts_with("create trigger hr.users_id_trg before insert on hr.users "));
    assert!(statements[2].contains("select hr.users_id_seq.nextval into :new.id"));
}
