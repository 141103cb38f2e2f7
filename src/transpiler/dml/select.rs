use crate::ast::*;
use crate::error::OracleResult;
use crate::transpiler::conditions::{compile_joins, compile_predicates, compile_wheres};
use crate::transpiler::{CompiledStatement, OracleCompiler};

/// Generate SELECT SQL.
///
/// Oracle has no `limit`/`offset` before 12c, so a positive limit or
/// offset wraps the query in a ROWNUM filter. A lock clause wins over
/// pagination: `for update` cannot be combined with the wrapped form, so
/// limit and offset are dropped.
pub fn build_select(
    compiler: &OracleCompiler,
    query: &QueryDescriptor,
) -> OracleResult<CompiledStatement> {
    let mut params = Vec::new();
    let mut sql = compile_components(compiler, query, &mut params)?;

    if query.has_lock() {
        if query.is_paginated() {
            tracing::warn!(
                "lock on '{}' suppresses limit/offset pagination",
                query.table
            );
        }
        if let Some(lock) = compile_lock(query.lock.as_ref()) {
            sql.push(' ');
            sql.push_str(&lock);
        }
    } else if query.is_paginated() {
        sql = paginate(
            &sql,
            query.limit.unwrap_or(0),
            query.offset.unwrap_or(0),
        );
    }

    Ok(CompiledStatement::with_params(sql, params))
}

/// `select 1 as "exists" ... and rownum = 1`
pub fn build_exists(
    compiler: &OracleCompiler,
    query: &QueryDescriptor,
) -> OracleResult<CompiledStatement> {
    let mut probe = query.clone();
    probe.columns = vec![Expr::Raw("1 as \"exists\"".to_string())];
    probe.aggregate = None;

    // keep `rownum = 1` outside any or-ed predicates
    if probe.wheres.iter().any(|p| p.boolean == Boolean::Or) {
        probe.wheres = vec![Predicate::nested(std::mem::take(&mut probe.wheres))];
    }
    probe.wheres.push(Predicate::raw("rownum = 1"));

    build_select(compiler, &probe)
}

/// Every clause except the lock, joined by single spaces.
fn compile_components(
    compiler: &OracleCompiler,
    query: &QueryDescriptor,
    params: &mut Vec<Value>,
) -> OracleResult<String> {
    let w = compiler.wrapper();
    let mut parts: Vec<String> = Vec::new();

    parts.push(compile_columns(compiler, query));
    parts.push(format!("from {}", w.wrap_table(&query.table)));

    if !query.joins.is_empty() {
        parts.push(compile_joins(compiler, &query.joins, params)?);
    }

    let wheres = compile_wheres(compiler, &query.wheres, params)?;
    if !wheres.is_empty() {
        parts.push(wheres);
    }

    if !query.group_by.is_empty() {
        parts.push(format!("group by {}", w.columnize(&query.group_by)));
    }

    let havings = compile_predicates(compiler, &query.havings, params)?;
    if !havings.is_empty() {
        parts.push(format!("having {}", havings));
    }

    if !query.order_by.is_empty() {
        let orders: Vec<String> = query
            .order_by
            .iter()
            .map(|order| match order {
                Ordering::Column { column, direction } => {
                    let dir = match direction {
                        SortOrder::Asc => "asc",
                        SortOrder::Desc => "desc",
                    };
                    format!("{} {}", w.wrap(column), dir)
                }
                Ordering::Raw(sql) => sql.clone(),
            })
            .collect();
        parts.push(format!("order by {}", orders.join(", ")));
    }

    Ok(parts.join(" "))
}

fn compile_columns(compiler: &OracleCompiler, query: &QueryDescriptor) -> String {
    let w = compiler.wrapper();
    let select = if query.distinct {
        "select distinct"
    } else {
        "select"
    };

    if let Some(aggregate) = &query.aggregate {
        let mut column = if aggregate.columns.is_empty() {
            "*".to_string()
        } else {
            w.columnize(&aggregate.columns)
        };
        if query.distinct && column != "*" {
            column = format!("distinct {}", column);
        }
        return format!("select {}({}) as aggregate", aggregate.function, column);
    }

    if query.columns.is_empty() {
        return format!("{} *", select);
    }

    let columns: Vec<String> = query
        .columns
        .iter()
        .map(|col| match col {
            Expr::Column(name) => w.wrap(name),
            Expr::Raw(sql) => sql.clone(),
        })
        .collect();
    format!("{} {}", select, columns.join(", "))
}

fn compile_lock(lock: Option<&Lock>) -> Option<String> {
    match lock? {
        Lock::Update => Some("for update".to_string()),
        Lock::Shared => None,
        Lock::Raw(sql) => Some(sql.trim().to_string()),
    }
}

/// Row filter applied to ROWNUM or the `"rn"` alias.
///
/// Bounds saturate at `u64::MAX` rather than overflow.
pub fn row_constraint(limit: u64, offset: u64) -> String {
    let start = offset.saturating_add(1);
    if limit == 1 {
        "= 1".to_string()
    } else if limit > 1 {
        format!("between {} and {}", start, offset.saturating_add(limit))
    } else {
        format!(">= {}", start)
    }
}

/// Wrap `inner` in the ROWNUM pagination form.
///
/// `limit > 1` and offset-only queries number the rows through an aliased
/// `"rn"` column. Offset-only queries use it in place of the plain
/// `where rownum >= n` form, which never matches for n > 1 since ROWNUM is
/// assigned as rows pass the filter.
pub fn paginate(inner: &str, limit: u64, offset: u64) -> String {
    let constraint = row_constraint(limit, offset);
    if limit > 1 || (limit == 0 && offset > 0) {
        format!(
            "select t2.* from (select rownum as \"rn\", t1.* from ({}) t1) t2 where t2.\"rn\" {}",
            inner, constraint
        )
    } else {
        format!("select * from ({}) where rownum {}", inner, constraint)
    }
}
