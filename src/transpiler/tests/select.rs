//! Select compilation: pagination rewrite, locks, exists, joins.

use crate::ast::*;
use crate::config::OracleConfig;
use crate::transpiler::{CompiledStatement, OracleCompiler, SqlCompiler};
use pretty_assertions::assert_eq;

fn compile(query: &QueryDescriptor) -> CompiledStatement {
    OracleCompiler::default().compile_select(query).unwrap()
}

fn paged(limit: Option<u64>, offset: Option<u64>) -> QueryDescriptor {
    let mut query = QueryDescriptor::new("users");
    query.limit = limit;
    query.offset = offset;
    query
}

#[test]
fn test_plain_select() {
    assert_eq!(compile(&QueryDescriptor::new("users")).sql, "select * from users");
}

#[test]
fn test_zero_limit_and_offset_are_not_rewritten() {
    assert_eq!(compile(&paged(Some(0), Some(0))).sql, "select * from users");
}

#[test]
fn test_limit_one_uses_plain_rownum() {
    let sql = compile(&paged(Some(1), None)).sql;
    assert_eq!(sql, "select * from (select * from users) where rownum = 1");
    assert!(!sql.contains("\"rn\""));
}

#[test]
fn test_limit_and_offset_use_row_number_alias() {
    let mut query = paged(Some(10), Some(20));
    query.order_by = vec![Ordering::asc("id")];
    assert_eq!(
        compile(&query).sql,
        "select t2.* from (select rownum as \"rn\", t1.* from (select * from users order by id asc) t1) t2 \
         where t2.\"rn\" between 21 and 30"
    );
}

#[test]
fn test_limit_without_offset() {
    assert_eq!(
        compile(&paged(Some(5), None)).sql,
        "select t2.* from (select rownum as \"rn\", t1.* from (select * from users) t1) t2 \
         where t2.\"rn\" between 1 and 5"
    );
}

#[test]
fn test_offset_only() {
    assert_eq!(
        compile(&paged(None, Some(5))).sql,
        "select t2.* from (select rownum as \"rn\", t1.* from (select * from users) t1) t2 \
         where t2.\"rn\" >= 6"
    );
}

#[test]
fn test_huge_offset_saturates() {
    assert_eq!(
        compile(&paged(Some(5), Some(u64::MAX))).sql,
        format!(
            "select t2.* from (select rownum as \"rn\", t1.* from (select * from users) t1) t2 \
             where t2.\"rn\" between {max} and {max}",
            max = u64::MAX
        )
    );
    assert!(
        compile(&paged(None, Some(u64::MAX)))
            .sql
            .ends_with(&format!(">= {}", u64::MAX))
    );
}

#[test]
fn test_lock_suppresses_pagination() {
    let mut query = paged(Some(10), Some(5));
    query.wheres = vec![Predicate::eq("id", 1)];
    query.lock = Some(Lock::Update);
    let stmt = compile(&query);
    assert_eq!(stmt.sql, "select * from users where id = ? for update");
    assert_eq!(stmt.params, vec![Value::Int(1)]);

    query.lock = Some(Lock::Raw("for update skip locked".into()));
    assert_eq!(
        compile(&query).sql,
        "select * from users where id = ? for update skip locked"
    );
}

#[test]
fn test_shared_lock_is_a_no_op() {
    let mut query = paged(Some(1), None);
    query.lock = Some(Lock::Shared);
    assert_eq!(
        compile(&query).sql,
        "select * from (select * from users) where rownum = 1"
    );
}

#[test]
fn test_exists() {
    let mut query = QueryDescriptor::new("users");
    query.wheres = vec![Predicate::eq("email", "a@b.c")];
    let stmt = OracleCompiler::default().compile_exists(&query).unwrap();
    assert_eq!(
        stmt.sql,
        "select 1 as \"exists\" from users where email = ? and rownum = 1"
    );
    assert_eq!(stmt.params, vec![Value::from("a@b.c")]);
}

#[test]
fn test_exists_groups_or_predicates() {
    let mut query = QueryDescriptor::new("users");
    query.wheres = vec![Predicate::eq("a", 1), Predicate::eq("b", 2).or()];
    let stmt = OracleCompiler::default().compile_exists(&query).unwrap();
    assert_eq!(
        stmt.sql,
        "select 1 as \"exists\" from users where (a = ? or b = ?) and rownum = 1"
    );
}

#[test]
fn test_joins_columns_and_order() {
    let mut query = QueryDescriptor::new("users");
    query.columns = vec!["users.id".into(), "posts.title as t".into()];
    query.joins = vec![Join::inner("posts", "users.id", "posts.user_id")];
    query.wheres = vec![Predicate::eq("posts.published", true)];
    query.order_by = vec![Ordering::desc("posts.created_at")];

    let stmt = compile(&query);
    assert_eq!(
        stmt.sql,
        "select users.id, posts.title as t from users \
         inner join posts on users.id = posts.user_id \
         where posts.published = ? order by posts.created_at desc"
    );
    assert_eq!(stmt.params, vec![Value::Bool(true)]);
}

#[test]
fn test_aggregate() {
    let mut query = QueryDescriptor::new("users");
    query.aggregate = Some(Aggregate {
        function: "count".into(),
        columns: vec![],
    });
    query.wheres = vec![Predicate::eq("active", 1)];
    assert_eq!(
        compile(&query).sql,
        "select count(*) as aggregate from users where active = ?"
    );

    query.distinct = true;
    query.aggregate = Some(Aggregate {
        function: "count".into(),
        columns: vec!["email".into()],
    });
    assert_eq!(
        compile(&query).sql,
        "select count(distinct email) as aggregate from users where active = ?"
    );
}

#[test]
fn test_group_by_having() {
    let mut query = QueryDescriptor::new("employees");
    query.columns = vec![Expr::Raw("dept_id, count(*) as total".into())];
    query.group_by = vec!["dept_id".into()];
    query.havings = vec![Predicate::raw("count(*) > 5")];
    assert_eq!(
        compile(&query).sql,
        "select dept_id, count(*) as total from employees group by dept_id having count(*) > 5"
    );
}

#[test]
fn test_reserved_words_and_schema_prefix() {
    let config = OracleConfig::builder().schema_prefix("hr").build().unwrap();
    let compiler = OracleCompiler::new(config);
    let mut query = QueryDescriptor::new("audit_log");
    query.columns = vec!["level".into(), "comment".into()];
    query.distinct = true;
    assert_eq!(
        compiler.compile_select(&query).unwrap().sql,
        "select distinct \"LEVEL\", \"COMMENT\" from hr.audit_log"
    );
}

#[test]
fn test_exists_subquery_params_are_ordered() {
    let mut sub = QueryDescriptor::new("orders");
    sub.columns = vec![Expr::Raw("1".into())];
    sub.wheres = vec![
        Predicate::columns("orders.user_id", "=", "users.id"),
        Predicate::basic("orders.total", ">", 100),
    ];

    let mut query = QueryDescriptor::new("users");
    query.wheres = vec![
        Predicate::eq("active", 1),
        Predicate::new(PredicateKind::Exists {
            query: Box::new(sub),
            negated: false,
        }),
    ];
    let stmt = compile(&query);
    assert_eq!(
        stmt.sql,
        "select * from users where active = ? and exists \
         (select 1 from orders where orders.user_id = users.id and orders.total > ?)"
    );
    assert_eq!(stmt.params, vec![Value::Int(1), Value::Int(100)]);
}

#[test]
fn test_numbered_placeholders() {
    let mut query = QueryDescriptor::new("users");
    query.wheres = vec![
        Predicate::eq("name", "x"),
        Predicate::raw("note <> 'why?'"),
        Predicate::eq("age", 3),
    ];
    assert_eq!(
        compile(&query).numbered_sql(),
        "select * from users where name = :1 and note <> 'why?' and age = :2"
    );
}
