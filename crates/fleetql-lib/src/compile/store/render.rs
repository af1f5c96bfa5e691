//! Predicate tree to parameterized SQL.

use super::{Column, Dialect, Predicate, SqlFragment, SqlValue, Subquery};
use crate::parser::Piece;

pub(super) fn render(predicate: &Predicate, dialect: &dyn Dialect) -> SqlFragment {
    let mut renderer = Renderer {
        dialect,
        sql: String::new(),
        params: Vec::new(),
    };
    renderer.predicate(predicate);
    SqlFragment {
        sql: renderer.sql,
        params: renderer.params,
    }
}

struct Renderer<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    params: Vec<SqlValue>,
}

impl Renderer<'_> {
    fn predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Compare {
                column,
                op,
                value,
                fold,
            } => {
                self.column(column, *fold);
                self.sql.push(' ');
                self.sql.push_str(op.as_str());
                self.sql.push(' ');
                self.param(value.clone());
            }
            Predicate::Like {
                column,
                pattern,
                negated,
                fold,
            } => {
                self.column(column, *fold);
                self.sql
                    .push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                let pattern = self.like_pattern(pattern);
                self.param(SqlValue::Text(pattern));
                self.sql.push_str(self.dialect.like_escape_clause());
            }
            Predicate::In {
                column,
                values,
                negated,
                fold,
            } => {
                self.column(column, *fold);
                self.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.param(value.clone());
                }
                self.sql.push(')');
            }
            Predicate::IsNull { column, negated } => {
                self.column(column, false);
                self.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Predicate::ColumnsEqual { left, right } => {
                self.column(left, false);
                self.sql.push_str(" = ");
                self.column(right, false);
            }
            Predicate::Exists(subquery) => {
                self.sql.push_str("EXISTS (");
                self.subquery(subquery);
                self.sql.push(')');
            }
            Predicate::Not(inner) => {
                self.sql.push_str("NOT ");
                let wrap = matches!(**inner, Predicate::And(..) | Predicate::Or(..));
                self.operand(inner, wrap);
            }
            Predicate::And(l, r) => {
                self.operand(l, matches!(**l, Predicate::Or(..)));
                self.sql.push_str(" AND ");
                self.operand(r, matches!(**r, Predicate::Or(..)));
            }
            Predicate::Or(l, r) => {
                self.predicate(l);
                self.sql.push_str(" OR ");
                self.predicate(r);
            }
        }
    }

    fn operand(&mut self, predicate: &Predicate, wrap: bool) {
        if wrap {
            self.sql.push('(');
            self.predicate(predicate);
            self.sql.push(')');
        } else {
            self.predicate(predicate);
        }
    }

    fn subquery(&mut self, subquery: &Subquery) {
        self.sql.push_str("SELECT 1 FROM ");
        self.sql.push_str(&subquery.from.table);
        self.sql.push(' ');
        self.sql.push_str(&subquery.from.alias);
        for join in &subquery.joins {
            self.sql.push_str(" JOIN ");
            self.sql.push_str(&join.source.table);
            self.sql.push(' ');
            self.sql.push_str(&join.source.alias);
            self.sql.push_str(" ON ");
            self.predicate(&join.on);
        }
        self.sql.push_str(" WHERE ");
        self.predicate(&subquery.filter);
    }

    fn column(&mut self, column: &Column, fold: bool) {
        let column = column.to_string();
        if fold {
            self.sql.push_str(&self.dialect.upper(&column));
        } else {
            self.sql.push_str(&column);
        }
    }

    fn param(&mut self, value: SqlValue) {
        self.params.push(value);
        self.sql.push_str(&self.dialect.placeholder(self.params.len()));
    }

    fn like_pattern(&self, pieces: &[Piece]) -> String {
        pieces
            .iter()
            .map(|piece| match piece {
                Piece::Text(text) => self.dialect.escape_like(text),
                Piece::Wildcard => "%".to_string(),
            })
            .collect()
    }
}
