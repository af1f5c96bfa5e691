//! Relational store backend.
//!
//! Plans lower to a dialect-neutral [`Predicate`] tree over column references
//! and correlated subqueries. Columns of the filtered entity are qualified by
//! its table name, so the rendered SQL fits a `SELECT .. FROM <table> WHERE ..`
//! issued by the caller. Joined paths become `EXISTS` subqueries with aliases
//! `j1`, `j2`, .. local to each subquery.

mod dialect;
mod render;


use fleetql_core::{BackendPath, FieldCatalog, ValueType};
use serde::Serialize;

pub use dialect::{Database, Dialect, escape_with_backslash, escape_with_brackets};

use super::invariants::{ensure_column, ensure_joined, ensure_sub_catalog, untraversable};
use super::plan::{Check, Order, Plan, Quantifier, Test};
use crate::bind::{BoundValue, FieldRef};
use crate::parser::Piece;

/// Qualified column: `alias.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub alias: String,
    pub name: String,
}

impl Column {
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.alias, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

impl From<Order> for CompareOp {
    fn from(order: Order) -> Self {
        match order {
            Order::Gt => CompareOp::Gt,
            Order::Ge => CompareOp::Ge,
            Order::Lt => CompareOp::Lt,
            Order::Le => CompareOp::Le,
        }
    }
}

/// Bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
            SqlValue::Integer(n) => write!(f, "{n}"),
            SqlValue::Number(n) => write!(f, "{n}"),
            SqlValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `fold` wraps the column in `UPPER()`; the value is already upper-cased.
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
        fold: bool,
    },
    Like {
        column: Column,
        pattern: Vec<Piece>,
        negated: bool,
        fold: bool,
    },
    In {
        column: Column,
        values: Vec<SqlValue>,
        negated: bool,
        fold: bool,
    },
    IsNull {
        column: Column,
        negated: bool,
    },
    /// Join condition.
    ColumnsEqual {
        left: Column,
        right: Column,
    },
    Exists(Box<Subquery>),
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn exists(subquery: Subquery) -> Self {
        Predicate::Exists(Box::new(subquery))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub table: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub source: Source,
    pub on: Predicate,
}

/// `SELECT 1 FROM from JOIN .. WHERE filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    pub from: Source,
    pub joins: Vec<Join>,
    pub filter: Predicate,
}

/// Rendered SQL condition with its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Compiled store predicate, ready to render for its database.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePredicate {
    predicate: Predicate,
    database: Database,
}

impl StorePredicate {
    pub fn new(predicate: Predicate, database: Database) -> Self {
        Self {
            predicate,
            database,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn to_sql(&self) -> SqlFragment {
        self.to_sql_with(&self.database)
    }

    /// Render with a custom dialect.
    pub fn to_sql_with(&self, dialect: &dyn Dialect) -> SqlFragment {
        render::render(&self.predicate, dialect)
    }
}

pub(crate) fn lower(plan: &Plan, catalog: &FieldCatalog, fold: bool) -> Predicate {
    Lowering { catalog, fold }.plan(plan)
}

struct Lowering<'a> {
    catalog: &'a FieldCatalog,
    fold: bool,
}

impl Lowering<'_> {
    fn plan(&self, plan: &Plan) -> Predicate {
        match plan {
            Plan::Check(check) => self.check(check),
            Plan::And(l, r) => Predicate::and(self.plan(l), self.plan(r)),
            Plan::Or(l, r) => Predicate::or(self.plan(l), self.plan(r)),
        }
    }

    fn check(&self, check: &Check) -> Predicate {
        let fold = self.fold && check.field.value_type() == ValueType::String;
        let scope = Scope::build(self.catalog, &check.field);
        let column = &scope.column;

        match check.quantifier {
            Quantifier::Holds => test(column, &check.test, false, fold),
            Quantifier::NullOrFails => match check.test {
                Test::Present => is_null(column, false),
                _ => Predicate::or(
                    is_null(column, false),
                    test(column, &check.test, true, fold),
                ),
            },
            Quantifier::Any => scope.exists(test(column, &check.test, false, fold)),
            Quantifier::NoneHold => {
                Predicate::not(scope.exists(test(column, &check.test, false, fold)))
            }
            Quantifier::EmptyOrAnyFails => Predicate::or(
                Predicate::not(scope.exists(is_null(column, true))),
                scope.exists(test(column, &check.test, true, fold)),
            ),
        }
    }
}

fn is_null(column: &Column, negated: bool) -> Predicate {
    Predicate::IsNull {
        column: column.clone(),
        negated,
    }
}

/// Single-row test, or its complement for non-null values when `negated`.
fn test(column: &Column, test: &Test, negated: bool, fold: bool) -> Predicate {
    let column = column.clone();
    match test {
        Test::Present => Predicate::IsNull {
            column,
            negated: !negated,
        },
        Test::Eq(value) => Predicate::Compare {
            column,
            op: if negated { CompareOp::Ne } else { CompareOp::Eq },
            value: sql_value(value, fold),
            fold,
        },
        Test::Like(pieces) => Predicate::Like {
            column,
            pattern: fold_pieces(pieces, fold),
            negated,
            fold,
        },
        Test::Order(order, value) => {
            let order = if negated { order.complement() } else { *order };
            Predicate::Compare {
                column,
                op: order.into(),
                value: sql_value(value, fold),
                fold,
            }
        }
        Test::In(values) => Predicate::In {
            column,
            values: values.iter().map(|v| sql_value(v, fold)).collect(),
            negated,
            fold,
        },
    }
}

fn sql_value(value: &BoundValue, fold: bool) -> SqlValue {
    match value {
        BoundValue::Text(text) if fold => SqlValue::Text(text.to_uppercase()),
        BoundValue::Integer(n) => SqlValue::Integer(*n),
        BoundValue::Number(n) => SqlValue::Number(*n),
        BoundValue::Boolean(b) => SqlValue::Boolean(*b),
        other => SqlValue::Text(other.to_text()),
    }
}

fn fold_pieces(pieces: &[Piece], fold: bool) -> Vec<Piece> {
    pieces
        .iter()
        .map(|piece| match piece {
            Piece::Text(text) if fold => Piece::Text(text.to_uppercase()),
            piece => piece.clone(),
        })
        .collect()
}

/// Tables a field path traverses, and the column holding its values.
struct Scope {
    sources: Vec<Join>,
    column: Column,
}

impl Scope {
    fn build(catalog: &FieldCatalog, field: &FieldRef) -> Self {
        let mut sources = Vec::new();
        let mut alias = catalog.table().to_string();
        let mut id_column = catalog.id_column().to_string();

        let (hops, leaf) = field.chain().split_at(field.chain().len() - 1);
        for hop in hops {
            let child = ensure_sub_catalog(hop);
            match hop.backend_path() {
                BackendPath::Reference { foreign_key } => {
                    let child_alias = alias_for(&sources);
                    sources.push(Join {
                        source: source(child.table(), &child_alias),
                        on: columns_equal(
                            Column::new(&child_alias, child.id_column()),
                            Column::new(&alias, foreign_key),
                        ),
                    });
                    alias = child_alias;
                }
                BackendPath::Rows { owner_column } => {
                    let child_alias = alias_for(&sources);
                    sources.push(Join {
                        source: source(child.table(), &child_alias),
                        on: columns_equal(
                            Column::new(&child_alias, owner_column),
                            Column::new(&alias, &id_column),
                        ),
                    });
                    alias = child_alias;
                }
                BackendPath::Link {
                    table,
                    owner_column,
                    child_column,
                } => {
                    let link_alias = alias_for(&sources);
                    sources.push(Join {
                        source: source(table, &link_alias),
                        on: columns_equal(
                            Column::new(&link_alias, owner_column),
                            Column::new(&alias, &id_column),
                        ),
                    });
                    let child_alias = alias_for(&sources);
                    sources.push(Join {
                        source: source(child.table(), &child_alias),
                        on: columns_equal(
                            Column::new(&child_alias, child.id_column()),
                            Column::new(&link_alias, child_column),
                        ),
                    });
                    alias = child_alias;
                }
                BackendPath::Column(_) | BackendPath::KeyValue { .. } => untraversable(hop),
            }
            id_column = child.id_column().to_string();
        }

        let leaf = &leaf[0];
        let column = match leaf.backend_path() {
            BackendPath::KeyValue {
                table,
                owner_column,
                key_column,
                value_column,
            } => {
                let map_alias = alias_for(&sources);
                let correlation = columns_equal(
                    Column::new(&map_alias, owner_column),
                    Column::new(&alias, &id_column),
                );
                let key = Predicate::Compare {
                    column: Column::new(&map_alias, key_column),
                    op: CompareOp::Eq,
                    value: SqlValue::Text(field.sub_key().unwrap_or_default().to_string()),
                    fold: false,
                };
                sources.push(Join {
                    source: source(table, &map_alias),
                    on: Predicate::and(correlation, key),
                });
                Column::new(map_alias, value_column)
            }
            _ => Column::new(alias, ensure_column(leaf)),
        };

        Self { sources, column }
    }

    /// `EXISTS` over the scope's rows that pass `filter`.
    fn exists(&self, filter: Predicate) -> Predicate {
        let (first, rest) = ensure_joined(&self.sources);
        Predicate::exists(Subquery {
            from: first.source.clone(),
            joins: rest.to_vec(),
            filter: Predicate::and(first.on.clone(), filter),
        })
    }
}

fn alias_for(sources: &[Join]) -> String {
    format!("j{}", sources.len() + 1)
}

fn source(table: &str, alias: &str) -> Source {
    Source {
        table: table.to_string(),
        alias: alias.to_string(),
    }
}

fn columns_equal(left: Column, right: Column) -> Predicate {
    Predicate::ColumnsEqual { left, right }
}
