//! SELECT statement emitter.
//!
//! Renders `SELECT <projection> FROM <joins> [WHERE <residual>]
//! [ORDER BY <column> ASC|DESC]`.

use super::dialect::Dialect;
use super::expr::{conjunction, ColumnRef, Condition};
use super::join::JoinSequence;
use super::token::{Token, TokenStream};

/// Statement emitted for a query with no graph patterns at all.
pub const EMPTY_RESULT: &str = "SELECT 1 WHERE 1=0";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[must_use = "SelectStatement has no effect until converted to SQL with to_sql()"]
pub struct SelectStatement {
    pub projection: Vec<ColumnRef>,
    pub from: TokenStream,
    pub where_clause: Vec<Condition>,
    pub order_by: Option<(ColumnRef, SortDir)>,
}

impl SelectStatement {
    pub fn new(from: &JoinSequence) -> Self {
        Self {
            projection: Vec::new(),
            from: from.to_tokens(),
            where_clause: Vec::new(),
            order_by: None,
        }
    }

    /// Set the SELECT list.
    pub fn select(mut self, columns: Vec<ColumnRef>) -> Self {
        self.projection = columns;
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Condition) -> Self {
        self.where_clause.push(condition);
        self
    }

    pub fn order_by(mut self, column: ColumnRef, dir: SortDir) -> Self {
        self.order_by = Some((column, dir));
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        for (i, col) in self.projection.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(col.to_token());
        }

        ts.space().push(Token::From).space().append(&self.from);

        if !self.where_clause.is_empty() {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&conjunction(&self.where_clause));
        }

        if let Some((col, dir)) = &self.order_by {
            ts.space()
                .push(Token::OrderBy)
                .space()
                .push(col.to_token())
                .space()
                .push(match dir {
                    SortDir::Asc => Token::Asc,
                    SortDir::Desc => Token::Desc,
                });
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}
