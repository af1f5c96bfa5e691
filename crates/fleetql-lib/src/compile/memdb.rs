//! Relational evaluator over in-memory tables.
//!
//! Executes [`Predicate`] trees with SQL three-valued logic so tests can
//! compare what a database would return with what the matcher decides.
//! Missing columns are NULL.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::store::{Column, CompareOp, Join, Predicate, SqlValue, Subquery};
use crate::parser::Piece;

pub type Row = HashMap<String, SqlValue>;

#[derive(Debug, Default)]
pub struct MemDb {
    tables: HashMap<String, Vec<Row>>,
}

/// Rows in scope, innermost last.
type Env<'a> = Vec<(&'a str, &'a Row)>;

impl MemDb {
    pub fn insert(&mut self, table: &str, cells: Vec<(&str, Option<SqlValue>)>) {
        let row = cells
            .into_iter()
            .filter_map(|(column, value)| Some((column.to_string(), value?)))
            .collect();
        self.tables.entry(table.to_string()).or_default().push(row);
    }

    /// `SELECT key FROM table WHERE predicate`, as integers.
    pub fn select_ids(&self, table: &str, key: &str, predicate: &Predicate) -> Vec<i64> {
        let mut ids = Vec::new();
        for row in self.rows(table) {
            let mut env = vec![(table, row)];
            if self.eval(predicate, &mut env) == Some(true)
                && let Some(SqlValue::Integer(id)) = row.get(key)
            {
                ids.push(*id);
            }
        }
        ids
    }

    fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    fn eval<'a>(&'a self, predicate: &'a Predicate, env: &mut Env<'a>) -> Option<bool> {
        match predicate {
            Predicate::Compare {
                column,
                op,
                value,
                fold,
            } => {
                let ordering = compare(&lookup(env, column, *fold)?, value)?;
                Some(match op {
                    CompareOp::Eq => ordering == Ordering::Equal,
                    CompareOp::Ne => ordering != Ordering::Equal,
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Ge => ordering != Ordering::Less,
                    CompareOp::Lt => ordering == Ordering::Less,
                    CompareOp::Le => ordering != Ordering::Greater,
                })
            }
            Predicate::Like {
                column,
                pattern,
                negated,
                fold,
            } => match lookup(env, column, *fold)? {
                SqlValue::Text(text) => Some(like(pattern, &text) != *negated),
                _ => None,
            },
            Predicate::In {
                column,
                values,
                negated,
                fold,
            } => {
                let actual = lookup(env, column, *fold)?;
                let found = values
                    .iter()
                    .any(|v| compare(&actual, v) == Some(Ordering::Equal));
                Some(found != *negated)
            }
            Predicate::IsNull { column, negated } => {
                Some(lookup(env, column, false).is_none() != *negated)
            }
            Predicate::ColumnsEqual { left, right } => {
                let left = lookup(env, left, false)?;
                let right = lookup(env, right, false)?;
                Some(compare(&left, &right)? == Ordering::Equal)
            }
            Predicate::Exists(subquery) => Some(self.exists(subquery, env)),
            Predicate::Not(inner) => self.eval(inner, env).map(|b| !b),
            Predicate::And(l, r) => match (self.eval(l, env), self.eval(r, env)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Predicate::Or(l, r) => match (self.eval(l, env), self.eval(r, env)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        }
    }

    fn exists<'a>(&'a self, subquery: &'a Subquery, env: &mut Env<'a>) -> bool {
        self.rows(&subquery.from.table).iter().any(|row| {
            env.push((subquery.from.alias.as_str(), row));
            let found = self.join(&subquery.joins, &subquery.filter, env);
            env.pop();
            found
        })
    }

    fn join<'a>(&'a self, joins: &'a [Join], filter: &'a Predicate, env: &mut Env<'a>) -> bool {
        let Some((join, rest)) = joins.split_first() else {
            return self.eval(filter, env) == Some(true);
        };
        self.rows(&join.source.table).iter().any(|row| {
            env.push((join.source.alias.as_str(), row));
            let found = self.eval(&join.on, env) == Some(true) && self.join(rest, filter, env);
            env.pop();
            found
        })
    }
}

fn lookup(env: &Env<'_>, column: &Column, fold: bool) -> Option<SqlValue> {
    let (_, row) = env
        .iter()
        .rev()
        .find(|(alias, _)| *alias == column.alias)
        .unwrap_or_else(|| panic!("alias `{}` is not in scope", column.alias));
    match row.get(&column.name)? {
        SqlValue::Text(text) if fold => Some(SqlValue::Text(text.to_uppercase())),
        value => Some(value.clone()),
    }
}

fn compare(left: &SqlValue, right: &SqlValue) -> Option<Ordering> {
    match (left, right) {
        (SqlValue::Text(l), SqlValue::Text(r)) => Some(l.cmp(r)),
        (SqlValue::Integer(l), SqlValue::Integer(r)) => Some(l.cmp(r)),
        (SqlValue::Integer(l), SqlValue::Number(r)) => (*l as f64).partial_cmp(r),
        (SqlValue::Number(l), SqlValue::Integer(r)) => l.partial_cmp(&(*r as f64)),
        (SqlValue::Number(l), SqlValue::Number(r)) => l.partial_cmp(r),
        (SqlValue::Boolean(l), SqlValue::Boolean(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// LIKE over decoded pattern pieces; `%` and `_` never appear unescaped.
fn like(pattern: &[Piece], text: &str) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((Piece::Text(literal), rest)) => text
            .strip_prefix(literal.as_str())
            .is_some_and(|tail| like(rest, tail)),
        Some((Piece::Wildcard, rest)) => text
            .char_indices()
            .map(|(i, _)| i)
            .chain([text.len()])
            .any(|i| like(rest, &text[i..])),
    }
}
