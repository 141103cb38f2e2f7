//! Where, having and join-condition compilation.

use super::OracleCompiler;
use super::dml::select;
use super::wrapper::parameterize;
use crate::ast::*;
use crate::error::{OracleError, OracleResult};

/// Oracle rejects `IN` lists longer than this (ORA-01795).
pub const MAX_IN_LIST: usize = 1000;

const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like", "&", "|", "^",
];

fn check_operator(operator: &str) -> OracleResult<String> {
    let op = operator.trim().to_lowercase();
    if OPERATORS.contains(&op.as_str()) {
        Ok(op)
    } else {
        Err(OracleError::InvalidOperator(operator.to_string()))
    }
}

/// Push the bindable values and return their placeholders.
fn bind_all(values: &[Value], params: &mut Vec<Value>) -> String {
    params.extend(values.iter().filter(|v| !v.is_raw()).cloned());
    parameterize(values)
}

fn bind(value: &Value, params: &mut Vec<Value>) -> String {
    bind_all(std::slice::from_ref(value), params)
}

/// Compile predicates joined by their connectors, without the leading
/// `where`. Empty nested groups are skipped.
pub fn compile_predicates(
    compiler: &OracleCompiler,
    predicates: &[Predicate],
    params: &mut Vec<Value>,
) -> OracleResult<String> {
    let mut sql = String::new();
    for predicate in predicates {
        let Some(fragment) = compile_predicate(compiler, &predicate.kind, params)? else {
            continue;
        };
        if !sql.is_empty() {
            sql.push(' ');
            sql.push_str(predicate.boolean.keyword());
            sql.push(' ');
        }
        sql.push_str(&fragment);
    }
    Ok(sql)
}

/// `where ...`, or an empty string when nothing compiles.
pub fn compile_wheres(
    compiler: &OracleCompiler,
    predicates: &[Predicate],
    params: &mut Vec<Value>,
) -> OracleResult<String> {
    let body = compile_predicates(compiler, predicates, params)?;
    Ok(if body.is_empty() {
        body
    } else {
        format!("where {}", body)
    })
}

fn compile_predicate(
    compiler: &OracleCompiler,
    kind: &PredicateKind,
    params: &mut Vec<Value>,
) -> OracleResult<Option<String>> {
    let w = compiler.wrapper();
    let sql = match kind {
        PredicateKind::Basic {
            column,
            operator,
            value,
        } => {
            let op = check_operator(operator)?;
            format!("{} {} {}", w.wrap(column), op, bind(value, params))
        }
        PredicateKind::In {
            column,
            values,
            negated,
        } => compile_in(compiler, column, values, *negated, params),
        PredicateKind::Null { column, negated } => {
            let not = if *negated { "not " } else { "" };
            format!("{} is {}null", w.wrap(column), not)
        }
        PredicateKind::Between {
            column,
            low,
            high,
            negated,
        } => {
            let not = if *negated { "not " } else { "" };
            let low = bind(low, params);
            let high = bind(high, params);
            format!("{} {}between {} and {}", w.wrap(column), not, low, high)
        }
        PredicateKind::Column {
            first,
            operator,
            second,
        } => {
            let op = check_operator(operator)?;
            format!("{} {} {}", w.wrap(first), op, w.wrap(second))
        }
        PredicateKind::Nested(inner) => {
            let body = compile_predicates(compiler, inner, params)?;
            if body.is_empty() {
                return Ok(None);
            }
            format!("({})", body)
        }
        PredicateKind::Exists { query, negated } => {
            let sub = select::build_select(compiler, query)?;
            params.extend(sub.params);
            let not = if *negated { "not " } else { "" };
            format!("{}exists ({})", not, sub.sql)
        }
        PredicateKind::Date {
            part,
            column,
            operator,
            value,
        } => {
            let op = check_operator(operator)?;
            let column = w.wrap(column);
            let value = bind(value, params);
            match part {
                DatePart::Date => {
                    format!("trunc({}) {} to_date({}, 'YYYY-MM-DD')", column, op, value)
                }
                DatePart::Time => format!("to_char({}, 'HH24:MI:SS') {} {}", column, op, value),
                DatePart::Day => format!("extract (day from {}) {} {}", column, op, value),
                DatePart::Month => format!("extract (month from {}) {} {}", column, op, value),
                DatePart::Year => format!("extract (year from {}) {} {}", column, op, value),
            }
        }
        PredicateKind::Raw { sql, bindings } => {
            params.extend(bindings.iter().cloned());
            sql.clone()
        }
    };
    Ok(Some(sql))
}

/// `col in (...)`, split into chunks of at most 1000 values.
///
/// Chunks of an `in` are or-ed, chunks of a `not in` are and-ed, and a
/// chunked list is parenthesized as one group.
fn compile_in(
    compiler: &OracleCompiler,
    column: &str,
    values: &[Value],
    negated: bool,
    params: &mut Vec<Value>,
) -> String {
    if values.is_empty() {
        return if negated { "1 = 1" } else { "0 = 1" }.to_string();
    }

    let column = compiler.wrapper().wrap(column);
    let keyword = if negated { "not in" } else { "in" };
    let chunks: Vec<String> = values
        .chunks(MAX_IN_LIST)
        .map(|chunk| format!("{} {} ({})", column, keyword, bind_all(chunk, params)))
        .collect();

    if chunks.len() == 1 {
        return chunks.into_iter().next().unwrap_or_default();
    }
    let glue = if negated { " and " } else { " or " };
    format!("({})", chunks.join(glue))
}

/// `inner join T on a = b and ...`, one clause per join.
pub fn compile_joins(
    compiler: &OracleCompiler,
    joins: &[Join],
    params: &mut Vec<Value>,
) -> OracleResult<String> {
    let mut clauses = Vec::with_capacity(joins.len());
    for join in joins {
        let table = compiler.wrapper().wrap_table(&join.table);
        let on = compile_predicates(compiler, &join.on, params)?;
        if on.is_empty() {
            clauses.push(format!("{} join {}", join.kind.keyword(), table));
        } else {
            clauses.push(format!("{} join {} on {}", join.kind.keyword(), table, on));
        }
    }
    Ok(clauses.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(predicates: &[Predicate]) -> (String, Vec<Value>) {
        let compiler = OracleCompiler::default();
        let mut params = Vec::new();
        let sql = compile_wheres(&compiler, predicates, &mut params).unwrap();
        (sql, params)
    }

    #[test]
    fn test_basic_connectors() {
        let (sql, params) = compile(&[
            Predicate::eq("name", "ann"),
            Predicate::basic("age", ">", 30).or(),
        ]);
        assert_eq!(sql, "where name = ? or age > ?");
        assert_eq!(params, vec![Value::from("ann"), Value::Int(30)]);
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let compiler = OracleCompiler::default();
        let mut params = Vec::new();
        let err = compile_wheres(
            &compiler,
            &[Predicate::basic("a", "; drop table x", 1)],
            &mut params,
        )
        .unwrap_err();
        assert!(matches!(err, OracleError::InvalidOperator(_)));
    }

    #[test]
    fn test_empty_in_lists() {
        let (sql, params) = compile(&[Predicate::is_in("id", vec![])]);
        assert_eq!(sql, "where 0 = 1");
        assert!(params.is_empty());

        let (sql, _) = compile(&[Predicate::not_in("id", vec![])]);
        assert_eq!(sql, "where 1 = 1");
    }

    #[test]
    fn test_in_chunking() {
        let values: Vec<Value> = (0..2500).map(Value::Int).collect();
        let (sql, params) = compile(&[Predicate::eq("active", 1), Predicate::is_in("id", values)]);

        assert_eq!(params.len(), 2501);
        assert!(sql.starts_with("where active = ? and (id in (?"));
        assert!(sql.ends_with("?))"));
        assert_eq!(sql.matches("id in (").count(), 3);
        assert_eq!(sql.matches(") or id in (").count(), 2);

        let chunk_sizes: Vec<usize> = sql
            .split("id in (")
            .skip(1)
            .map(|chunk| chunk.matches('?').count())
            .collect();
        assert_eq!(chunk_sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_not_in_chunking_uses_and() {
        let values: Vec<Value> = (0..1001).map(Value::Int).collect();
        let (sql, _) = compile(&[Predicate::not_in("id", values)]);
        assert!(sql.starts_with("where (id not in ("));
        assert_eq!(sql.matches(") and id not in (").count(), 1);
    }

    #[test]
    fn test_date_predicates() {
        let (sql, _) = compile(&[
            Predicate::date(DatePart::Date, "created_at", "=", "2024-01-31"),
            Predicate::date(DatePart::Year, "created_at", ">=", 2020),
            Predicate::date(DatePart::Time, "created_at", "<", "12:00:00"),
        ]);
        assert_eq!(
            sql,
            "where trunc(created_at) = to_date(?, 'YYYY-MM-DD') \
             and extract (year from created_at) >= ? \
             and to_char(created_at, 'HH24:MI:SS') < ?"
        );
    }

    #[test]
    fn test_nested_null_between() {
        let (sql, params) = compile(&[
            Predicate::is_null("deleted_at"),
            Predicate::nested(vec![
                Predicate::eq("role", "admin"),
                Predicate::eq("role", "owner").or(),
            ]),
            Predicate::new(PredicateKind::Between {
                column: "age".into(),
                low: Value::Int(18),
                high: Value::Int(65),
                negated: true,
            }),
            Predicate::nested(vec![]),
        ]);
        assert_eq!(
            sql,
            "where deleted_at is null and (role = ? or role = ?) and age not between ? and ?"
        );
        assert_eq!(params.len(), 4);
    }
}
