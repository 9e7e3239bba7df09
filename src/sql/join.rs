//! Join structures.
//!
//! A [`JoinSequence`] is built incrementally: it starts from one
//! [`Joinable`] and each `add_join` appends `JOIN x ON (...)` or
//! `LEFT OUTER JOIN x ON (...)`. A sequence is itself joinable, which is how
//! the sub-plan of each graph pattern is attached to the main sequence.

use indexmap::{IndexMap, IndexSet};

use super::expr::{conjunction, Column, ColumnRef, Condition};
use super::token::{Token, TokenStream};
use crate::rdf::TriplePattern;

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

impl JoinType {
    fn to_token(self) -> Token {
        match self {
            JoinType::Inner => Token::Join,
            JoinType::LeftOuter => Token::LeftOuterJoin,
        }
    }
}

/// An ON clause: conditions with set semantics, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinConditions {
    conditions: IndexSet<Condition>,
}

impl JoinConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition. Returns false if it was already present.
    pub fn add(&mut self, condition: Condition) -> bool {
        self.conditions.insert(condition)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn to_tokens(&self) -> TokenStream {
        conjunction(&self.conditions)
    }
}

impl Extend<Condition> for JoinConditions {
    fn extend<I: IntoIterator<Item = Condition>>(&mut self, iter: I) {
        self.conditions.extend(iter);
    }
}

/// A variable exposed by a joinable, with the column it occupies there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinVar {
    pub name: String,
    pub column: ColumnRef,
}

/// One predicate table standing for one triple pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTable {
    name: String,
    alias: String,
    vars: Vec<JoinVar>,
}

impl JoinTable {
    pub fn new(name: impl Into<String>, alias: impl Into<String>, pattern: &TriplePattern) -> Self {
        let alias = alias.into();
        let mut vars = Vec::new();
        if let Some(v) = pattern.subject.variable() {
            vars.push(JoinVar {
                name: v.name().to_string(),
                column: ColumnRef::new(alias.clone(), Column::Subject),
            });
        }
        if let Some(v) = pattern.object.variable() {
            vars.push(JoinVar {
                name: v.name().to_string(),
                column: ColumnRef::new(alias.clone(), Column::Object),
            });
        }
        Self {
            name: name.into(),
            alias,
            vars,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn join_vars(&self) -> &[JoinVar] {
        &self.vars
    }

    /// `name`, or `name AS alias` when they differ.
    pub fn declaration(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()));
        if self.name != self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(self.alias.clone()));
        }
        ts
    }
}

/// Anything that can appear on either side of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum Joinable {
    Table(JoinTable),
    Sequence(JoinSequence),
}

impl Joinable {
    pub fn join_vars(&self) -> Vec<JoinVar> {
        match self {
            Joinable::Table(t) => t.join_vars().to_vec(),
            Joinable::Sequence(s) => s.join_vars(),
        }
    }

    pub fn aliases(&self) -> Vec<&str> {
        match self {
            Joinable::Table(t) => vec![t.alias()],
            Joinable::Sequence(s) => s.aliases(),
        }
    }

    pub fn declaration(&self) -> TokenStream {
        match self {
            Joinable::Table(t) => t.declaration(),
            Joinable::Sequence(s) => s.declaration(),
        }
    }
}

impl From<JoinTable> for Joinable {
    fn from(t: JoinTable) -> Self {
        Joinable::Table(t)
    }
}

impl From<JoinSequence> for Joinable {
    fn from(s: JoinSequence) -> Self {
        Joinable::Sequence(s)
    }
}

/// A chain of joins, rendered as it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSequence {
    tokens: TokenStream,
    joined: Vec<Joinable>,
}

impl JoinSequence {
    pub fn new(start: impl Into<Joinable>) -> Self {
        let start = start.into();
        Self {
            tokens: start.declaration(),
            joined: vec![start],
        }
    }

    /// Append `<join type> <declaration> [ON (<conditions>)]`.
    pub fn add_join(
        &mut self,
        join_type: JoinType,
        joinable: impl Into<Joinable>,
        conditions: &JoinConditions,
    ) {
        let joinable = joinable.into();
        self.tokens
            .space()
            .push(join_type.to_token())
            .space()
            .append(&joinable.declaration());
        if !conditions.is_empty() {
            self.tokens
                .space()
                .push(Token::On)
                .space()
                .lparen()
                .append(&conditions.to_tokens())
                .rparen();
        }
        self.joined.push(joinable);
    }

    /// Equalities linking this sequence to `candidate` through shared variables.
    ///
    /// A pair is linked only when this sequence's column for the variable is
    /// the one recorded in `bindings`, so each variable joins against its
    /// primary column rather than against every copy of it.
    pub fn binding_conditions(
        &self,
        candidate: &Joinable,
        bindings: &IndexMap<String, ColumnRef>,
    ) -> JoinConditions {
        let mut conditions = JoinConditions::new();
        let candidate_vars = candidate.join_vars();
        for existing in self.join_vars() {
            if bindings.get(&existing.name) != Some(&existing.column) {
                continue;
            }
            for var in candidate_vars.iter().filter(|v| v.name == existing.name) {
                conditions.add(Condition::equals(
                    existing.column.clone(),
                    var.column.clone(),
                ));
            }
        }
        conditions
    }

    /// Variables exposed by every member, deduplicated, in join order.
    pub fn join_vars(&self) -> Vec<JoinVar> {
        let vars: IndexSet<JoinVar> = self.joined.iter().flat_map(|j| j.join_vars()).collect();
        vars.into_iter().collect()
    }

    /// Table aliases of every member, in join order.
    pub fn aliases(&self) -> Vec<&str> {
        self.joined.iter().flat_map(|j| j.aliases()).collect()
    }

    /// The sequence as it appears nested inside another join:
    /// bare for a single member, parenthesized otherwise.
    pub fn declaration(&self) -> TokenStream {
        if self.joined.len() == 1 {
            return self.tokens.clone();
        }
        let mut ts = TokenStream::new();
        ts.lparen().append(&self.tokens).rparen();
        ts
    }

    /// The sequence as a top-level FROM clause.
    pub fn to_tokens(&self) -> TokenStream {
        self.tokens.clone()
    }
}
