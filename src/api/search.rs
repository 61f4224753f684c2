//! `?search=` matching.
//!
//! Matching is case-insensitive on every backend: both sides are lowered, since
//! a plain `LIKE` is case-sensitive on PostgreSQL. Wildcards typed by the client
//! are escaped and match literally.

use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait,
};

const ESCAPE: char = '|';

/// A non-blank search term, ready to be matched against columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pattern: String,
}

impl SearchTerm {
    /// `None` for a missing or blank `?search=`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let term = raw.map(str::trim).filter(|term| !term.is_empty())?;

        Some(Self {
            pattern: format!("%{}%", escape_like(&term.to_lowercase())),
        })
    }

    /// `LOWER(column) LIKE '%term%'`.
    pub fn matches<C: ColumnTrait>(&self, column: C) -> SimpleExpr {
        Expr::expr(Func::lower(column.into_expr()))
            .like(LikeExpr::new(self.pattern.as_str()).escape(ESCAPE))
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
