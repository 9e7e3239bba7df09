//! Predicate-table resolution and alias bookkeeping.
//!
//! The first reference to a predicate uses its table name as the alias, so
//! simple queries read naturally (`FROM t_p`). Later references to the same
//! predicate get numbered aliases (`t_p AS t_p_1`) for self-joins.
//!
//! A predicate with no table is replaced by [`EMPTY_RELATION`], a derived
//! table with the right shape and no rows, aliased `np_K`.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use super::ArgumentError;
use crate::rdf::{IriRef, PredicatePattern};
use crate::sql::{Dialect, Token, TokenStream};
use crate::tables::TableManager;

/// Relation substituted for predicates that have no backing table.
pub const EMPTY_RELATION: &str = "(SELECT p AS s, p AS o FROM tMap WHERE 1=0)";

/// A relation in the FROM clause: physical name (or derived table) plus alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpTable {
    name: String,
    alias: String,
}

impl MpTable {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Maps predicates to aliased tables for the lifetime of one compile.
pub struct TableResolver<'a> {
    tables: &'a dyn TableManager,
    /// Every alias issued per predicate, in order.
    predicate_aliases: HashMap<IriRef, Vec<String>>,
    /// First sentinel issued per unmapped predicate.
    unknown: IndexMap<IriRef, MpTable>,
    union_count: usize,
}

impl<'a> TableResolver<'a> {
    pub fn new(tables: &'a dyn TableManager) -> Self {
        Self {
            tables,
            predicate_aliases: HashMap::new(),
            unknown: IndexMap::new(),
            union_count: 0,
        }
    }

    /// Resolve the predicate of a triple pattern to an aliased table.
    pub fn map_predicate_table(
        &mut self,
        predicate: &PredicatePattern,
    ) -> Result<MpTable, ArgumentError> {
        match predicate {
            PredicatePattern::Variable(v) => Err(ArgumentError::VariablePredicate(v.to_string())),
            PredicatePattern::Iri(iri) => Ok(self.map_iri(iri)),
        }
    }

    fn map_iri(&mut self, predicate: &IriRef) -> MpTable {
        let Some(name) = self.tables.table_for(predicate) else {
            return self.map_unknown(predicate);
        };

        let alias = match self.predicate_aliases.get_mut(predicate) {
            Some(aliases) => {
                let alias = format!("{}_{}", name, aliases.len());
                aliases.push(alias.clone());
                alias
            }
            None => {
                self.predicate_aliases
                    .insert(predicate.clone(), vec![name.clone()]);
                name.clone()
            }
        };

        debug!(%predicate, table = %name, %alias, "mapped predicate");
        MpTable::new(name, alias)
    }

    fn map_unknown(&mut self, predicate: &IriRef) -> MpTable {
        if let Some(primary) = self.unknown.get(predicate) {
            let aliases = self.predicate_aliases.entry(predicate.clone()).or_default();
            let alias = format!("{}_{}", primary.alias(), aliases.len());
            aliases.push(alias.clone());
            debug!(%predicate, %alias, "unmapped predicate seen again");
            return MpTable::new(EMPTY_RELATION, alias);
        }

        let alias = format!("np_{}", self.unknown.len());
        debug!(%predicate, %alias, "no table for predicate, using empty relation");
        let table = MpTable::new(EMPTY_RELATION, alias.clone());
        self.unknown.insert(predicate.clone(), table.clone());
        self.predicate_aliases.insert(predicate.clone(), vec![alias]);
        table
    }

    /// Relation holding the union of every mapped predicate table.
    ///
    /// This is the plan for a variable predicate. The planner rejects
    /// variable predicates, so nothing calls this during a compile.
    pub fn all_table_query(&self) -> String {
        let names: Vec<String> = self
            .tables
            .predicates()
            .iter()
            .filter_map(|p| self.tables.table_for(p))
            .collect();

        if names.is_empty() {
            return EMPTY_RELATION.to_string();
        }

        let mut ts = TokenStream::new();
        ts.lparen();
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                ts.space().push(Token::UnionAll).space();
            }
            ts.push(Token::Select)
                .space()
                .push(Token::Star)
                .space()
                .push(Token::From)
                .space()
                .push(Token::Ident(name));
        }
        ts.rparen();
        ts.serialize(Dialect::default())
    }

    /// Issue an `ap_N` alias over [`all_table_query`](Self::all_table_query).
    pub fn map_all_tables(&mut self) -> MpTable {
        self.union_count += 1;
        MpTable::new(self.all_table_query(), format!("ap_{}", self.union_count))
    }
}
