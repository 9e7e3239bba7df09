//! Column references and the conditions built from them.
//!
//! Every MPT relation has exactly two columns, `s` and `o`, so a column is
//! fully described by a table alias plus one of the two positions. Conditions
//! are kept as structured values until serialization so that the planner can
//! deduplicate and move them between ON clauses and WHERE.

use std::fmt;

use super::dialect::Dialect;
use super::token::{Token, TokenStream};

/// One of the two columns of a predicate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Subject,
    Object,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::Subject => "s",
            Column::Object => "o",
        }
    }
}

/// A qualified column: `alias.s` or `alias.o`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: Column,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: Column) -> Self {
        Self {
            table: table.into(),
            column,
        }
    }

    pub fn subject(table: impl Into<String>) -> Self {
        Self::new(table, Column::Subject)
    }

    pub fn object(table: impl Into<String>) -> Self {
        Self::new(table, Column::Object)
    }

    pub fn to_token(&self) -> Token {
        Token::Column {
            table: self.table.clone(),
            column: self.column.name().to_string(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column.name())
    }
}

/// One side of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Column(ColumnRef),
    /// Unquoted value text; quoted for the dialect on serialization.
    Value(String),
}

impl Operand {
    pub fn to_token(&self) -> Token {
        match self {
            Operand::Column(c) => c.to_token(),
            Operand::Value(v) => Token::LitString(v.clone()),
        }
    }
}

impl From<ColumnRef> for Operand {
    fn from(c: ColumnRef) -> Self {
        Operand::Column(c)
    }
}

/// A binary condition `left op right`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub left: Operand,
    pub op: String,
    pub right: Operand,
}

impl Condition {
    pub fn new(left: impl Into<Operand>, op: &str, right: impl Into<Operand>) -> Self {
        Self {
            left: left.into(),
            op: op.trim().to_string(),
            right: right.into(),
        }
    }

    /// `left = right`
    pub fn equals(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(left, "=", right)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        let op = if self.op == "=" {
            Token::Eq
        } else {
            Token::Operator(self.op.clone())
        };
        ts.push(self.left.to_token())
            .space()
            .push(op)
            .space()
            .push(self.right.to_token());
        ts
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tokens().serialize(Dialect::default()))
    }
}

/// Render conditions joined by `AND`.
pub fn conjunction<'a>(conditions: impl IntoIterator<Item = &'a Condition>) -> TokenStream {
    let mut ts = TokenStream::new();
    for (i, c) in conditions.into_iter().enumerate() {
        if i > 0 {
            ts.space().push(Token::And).space();
        }
        ts.append(&c.to_tokens());
    }
    ts
}
