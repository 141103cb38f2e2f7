//! Insert, update, delete and LOB write compilation.

use crate::ast::*;
use crate::error::OracleError;
use crate::transpiler::{OracleCompiler, SqlCompiler};
use pretty_assertions::assert_eq;

fn compiler() -> OracleCompiler {
    OracleCompiler::default()
}

fn user(email: &str, name: &str) -> Row {
    vec![
        ("email".to_string(), Value::from(email)),
        ("name".to_string(), Value::from(name)),
    ]
}

#[test]
fn test_single_row_insert() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(user("a@x.io", "Ann"));
    let stmt = compiler().compile_insert(&insert).unwrap();
    assert_eq!(stmt.sql, "insert into users (email, name) values (?, ?)");
    assert_eq!(stmt.params, vec![Value::from("a@x.io"), Value::from("Ann")]);
    assert!(stmt.outputs.is_empty());
}

#[test]
fn test_batch_insert_uses_union_all() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(user("a@x.io", "Ann"));
    insert.rows.push(user("b@x.io", "Bob"));
    insert.rows.push(user("c@x.io", "Cyd"));

    let stmt = compiler().compile_insert(&insert).unwrap();
    assert_eq!(
        stmt.sql,
        "insert into users (email, name) select ?, ? from dual \
         union all select ?, ? from dual union all select ?, ? from dual"
    );
    assert_eq!(stmt.sql.matches("union all").count(), 2);
    assert_eq!(stmt.params.len(), 6);
}

#[test]
fn test_batch_rows_are_reordered_to_first_row() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(user("a@x.io", "Ann"));
    insert.rows.push(vec![
        ("name".to_string(), Value::from("Bob")),
        ("email".to_string(), Value::from("b@x.io")),
    ]);
    let stmt = compiler().compile_insert(&insert).unwrap();
    assert_eq!(
        stmt.params,
        vec![
            Value::from("a@x.io"),
            Value::from("Ann"),
            Value::from("b@x.io"),
            Value::from("Bob"),
        ]
    );
}

#[test]
fn test_mismatched_batch_is_rejected() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(user("a@x.io", "Ann"));
    insert
        .rows
        .push(vec![("email".to_string(), Value::from("b@x.io"))]);
    let err = compiler().compile_insert(&insert).unwrap_err();
    assert!(matches!(err, OracleError::ColumnMismatch { row: 1, .. }));
}

#[test]
fn test_empty_insert_is_rejected() {
    let insert = InsertDescriptor::new("users");
    assert!(matches!(
        compiler().compile_insert(&insert),
        Err(OracleError::EmptyInsert)
    ));
}

#[test]
fn test_raw_values_are_inlined() {
    let mut insert = InsertDescriptor::new("events");
    insert.rows.push(vec![
        ("kind".to_string(), Value::from("login")),
        ("created_at".to_string(), Value::Raw("sysdate".into())),
    ]);
    let stmt = compiler().compile_insert(&insert).unwrap();
    assert_eq!(
        stmt.sql,
        "insert into events (kind, created_at) values (?, sysdate)"
    );
    assert_eq!(stmt.params, vec![Value::from("login")]);
}

#[test]
fn test_insert_get_id() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(vec![("email".to_string(), Value::from("a@x.io"))]);
    let stmt = compiler().compile_insert_get_id(&insert).unwrap();
    assert_eq!(
        stmt.sql,
        "insert into users (email) values (?) returning id into ?"
    );
    assert_eq!(stmt.outputs, vec![OutBinding::key("id")]);
    assert_eq!(stmt.outputs[0].max_length, Some(38));
}

#[test]
fn test_insert_get_id_with_custom_key() {
    let mut insert = InsertDescriptor::new("orders");
    insert.sequence_column = Some("order_no".into());
    insert.rows.push(vec![("total".to_string(), Value::Float(9.5))]);
    let stmt = compiler().compile_insert_get_id(&insert).unwrap();
    assert!(stmt.sql.ends_with("returning order_no into ?"));
}

#[test]
fn test_insert_get_id_skips_returning_for_explicit_key() {
    let mut insert = InsertDescriptor::new("users");
    insert.rows.push(vec![
        ("id".to_string(), Value::Int(42)),
        ("email".to_string(), Value::from("a@x.io")),
    ]);
    let stmt = compiler().compile_insert_get_id(&insert).unwrap();
    assert_eq!(stmt.sql, "insert into users (id, email) values (?, ?)");
    assert!(stmt.outputs.is_empty());
}

#[test]
fn test_insert_lob() {
    let mut insert = InsertDescriptor::new("documents");
    insert.rows.push(vec![("title".to_string(), Value::from("draft"))]);
    insert.binary_columns = vec![("body".into(), b"%PDF".to_vec())];

    let stmt = compiler().compile_insert_lob(&insert).unwrap();
    assert_eq!(
        stmt.sql,
        "insert into documents (title, body) values (?, EMPTY_BLOB()) returning body, id into ?, ?"
    );
    assert_eq!(stmt.params, vec![Value::from("draft")]);
    assert_eq!(
        stmt.outputs,
        vec![OutBinding::blob_locator("body"), OutBinding::key("id")]
    );
}

#[test]
fn test_insert_lob_rejects_batches() {
    let mut insert = InsertDescriptor::new("documents");
    insert.rows.push(vec![("title".to_string(), Value::from("a"))]);
    insert.rows.push(vec![("title".to_string(), Value::from("b"))]);
    insert.binary_columns = vec![("body".into(), vec![1])];
    assert!(compiler().compile_insert_lob(&insert).is_err());
}

#[test]
fn test_update() {
    let update = UpdateDescriptor::new("users")
        .set("name", "Ann")
        .set("updated_at", Value::Raw("systimestamp".into()))
        .filter(Predicate::eq("id", 7));
    let stmt = compiler().compile_update(&update).unwrap();
    assert_eq!(
        stmt.sql,
        "update users set name = ?, updated_at = systimestamp where id = ?"
    );
    assert_eq!(stmt.params, vec![Value::from("Ann"), Value::Int(7)]);
}

#[test]
fn test_update_without_assignments_fails() {
    let update = UpdateDescriptor::new("users").filter(Predicate::eq("id", 7));
    let err = compiler().compile_update(&update).unwrap_err();
    assert!(err.is_compile_error());
}

#[test]
fn test_update_lob() {
    let mut update = UpdateDescriptor::new("documents")
        .set("title", "v2")
        .filter(Predicate::eq("id", 3));
    update.binary_columns = vec![("body".into(), vec![0xde, 0xad])];

    let stmt = compiler().compile_update_lob(&update).unwrap();
    assert_eq!(
        stmt.sql,
        "update documents set title = ?, body = EMPTY_BLOB() where id = ? returning body, id into ?, ?"
    );
    assert_eq!(stmt.params, vec![Value::from("v2"), Value::Int(3)]);
    assert_eq!(stmt.outputs.len(), 2);
}

#[test]
fn test_delete_and_truncate() {
    let delete = DeleteDescriptor::new("sessions")
        .filter(Predicate::basic("expires_at", "<", Value::Raw("sysdate".into())));
    let stmt = compiler().compile_delete(&delete).unwrap();
    assert_eq!(stmt.sql, "delete from sessions where expires_at < sysdate");
    assert!(stmt.params.is_empty());

    assert_eq!(
        compiler().compile_delete(&DeleteDescriptor::new("sessions")).unwrap().sql,
        "delete from sessions"
    );
    assert_eq!(compiler().compile_truncate("sessions"), "truncate table sessions");
}

#[test]
fn test_in_list_chunking() {
    let ids: Vec<Value> = (0..2500).map(Value::Int).collect();
    let mut query = QueryDescriptor::new("users");
    query.wheres = vec![Predicate::is_in("id", ids.clone())];
    let stmt = compiler().compile_select(&query).unwrap();
    assert_eq!(stmt.sql.matches("id in (").count(), 3);
    assert_eq!(stmt.sql.matches(" or ").count(), 2);
    assert_eq!(stmt.params.len(), 2500);

    query.wheres = vec![Predicate::not_in("id", ids)];
    let stmt = compiler().compile_select(&query).unwrap();
    assert_eq!(stmt.sql.matches("id not in (").count(), 3);
    assert_eq!(stmt.sql.matches(") and id").count(), 2);
}
