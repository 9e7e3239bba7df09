//! Per-compile planner state and pattern binding.
//!
//! [`PlanState`] owns everything a single compile mutates: the table
//! resolver, the set of triple patterns already planned, and the pending
//! conditions per table alias that have not yet been placed in an ON clause.
//! A fresh state is created for every compile, so a compiler can be reused.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::resolver::{MpTable, TableResolver};
use super::ArgumentError;
use crate::rdf::{NodePattern, TriplePattern};
use crate::sql::{ColumnRef, Condition, Operand};
use crate::tables::TableManager;

/// Variable name to the column it was first bound to.
pub type Bindings = IndexMap<String, ColumnRef>;

/// Which part of the query a pending condition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Required,
    Optional,
}

#[derive(Debug, Clone)]
struct Pending {
    origin: Origin,
    conditions: IndexSet<Condition>,
}

pub struct PlanState<'a> {
    resolver: TableResolver<'a>,
    encountered: HashSet<TriplePattern>,
    pending: IndexMap<String, Pending>,
    origin: Origin,
}

impl<'a> PlanState<'a> {
    pub fn new(tables: &'a dyn TableManager) -> Self {
        Self {
            resolver: TableResolver::new(tables),
            encountered: HashSet::new(),
            pending: IndexMap::new(),
            origin: Origin::Required,
        }
    }

    /// Set the origin recorded on conditions added from now on.
    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    /// Bind a triple pattern to a table alias.
    ///
    /// Returns `None` if the same pattern was already planned. Otherwise
    /// unbound variables are bound to this table's columns, and constants
    /// become pending equality conditions on the alias.
    pub fn bind_pattern(
        &mut self,
        pattern: &TriplePattern,
        bindings: &mut Bindings,
    ) -> Result<Option<MpTable>, ArgumentError> {
        if self.encountered.contains(pattern) {
            debug!(%pattern, "pattern already planned");
            return Ok(None);
        }

        let table = self.resolver.map_predicate_table(&pattern.predicate)?;
        self.encountered.insert(pattern.clone());

        self.bind_node(&pattern.subject, ColumnRef::subject(table.alias()), bindings);
        self.bind_node(&pattern.object, ColumnRef::object(table.alias()), bindings);

        Ok(Some(table))
    }

    fn bind_node(&mut self, node: &NodePattern, column: ColumnRef, bindings: &mut Bindings) {
        match node {
            NodePattern::Variable(v) => match bindings.get(v.name()) {
                None => {
                    debug!(variable = %v, %column, "bound variable");
                    bindings.insert(v.name().to_string(), column);
                }
                // same variable twice in one pattern: `?x <p> ?x`
                Some(existing) if existing.table == column.table && *existing != column => {
                    let condition = Condition::equals(existing.clone(), column.clone());
                    self.add_pending(&column.table, condition);
                }
                Some(_) => {}
            },
            NodePattern::Node(n) => {
                let table = column.table.clone();
                let condition = Condition::equals(column, Operand::Value(n.to_string()));
                self.add_pending(&table, condition);
            }
        }
    }

    pub fn add_pending(&mut self, alias: &str, condition: Condition) {
        let origin = self.origin;
        self.pending
            .entry(alias.to_string())
            .or_insert_with(|| Pending {
                origin,
                conditions: IndexSet::new(),
            })
            .conditions
            .insert(condition);
    }

    /// Remove one pending condition, if present.
    pub fn remove_pending(&mut self, alias: &str, condition: &Condition) {
        if let Some(p) = self.pending.get_mut(alias) {
            p.conditions.shift_remove(condition);
        }
    }

    /// Take every pending condition on `alias`.
    pub fn take_pending(&mut self, alias: &str) -> Vec<Condition> {
        self.pending
            .shift_remove(alias)
            .map(|p| p.conditions.into_iter().collect())
            .unwrap_or_default()
    }

    /// Take every pending condition, in the order the aliases were first seen.
    pub fn drain_pending(&mut self) -> Vec<(Origin, Condition)> {
        std::mem::take(&mut self.pending)
            .into_values()
            .flat_map(|p| {
                let origin = p.origin;
                p.conditions.into_iter().map(move |c| (origin, c))
            })
            .collect()
    }
}

/// A variable is bound once it has a column; a constant is always bound.
pub fn is_bound(node: &NodePattern, bindings: &Bindings) -> bool {
    match node {
        NodePattern::Variable(v) => bindings.contains_key(v.name()),
        NodePattern::Node(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::IriRef;
    use crate::sql::Dialect;
    use crate::tables::InMemoryTableManager;

    fn tables() -> InMemoryTableManager {
        InMemoryTableManager::new()
            .with_table(IriRef::new("http://ex/p").unwrap(), "t_p")
            .with_table(IriRef::new("http://ex/q").unwrap(), "t_q")
    }

    fn tp(s: &str, p: &str, o: &str) -> TriplePattern {
        TriplePattern::parse(s, p, o).unwrap()
    }

    fn render(conditions: &[Condition]) -> Vec<String> {
        conditions
            .iter()
            .map(|c| c.to_tokens().serialize(Dialect::Postgres))
            .collect()
    }

    #[test]
    fn test_bind_variables_first_binding_wins() {
        let tables = tables();
        let mut state = PlanState::new(&tables);
        let mut bindings = Bindings::new();

        state
            .bind_pattern(&tp("?x", "<http://ex/p>", "?y"), &mut bindings)
            .unwrap();
        state
            .bind_pattern(&tp("?y", "<http://ex/q>", "?z"), &mut bindings)
            .unwrap();

        assert_eq!(bindings["x"], ColumnRef::subject("t_p"));
        assert_eq!(bindings["y"], ColumnRef::object("t_p"));
        assert_eq!(bindings["z"], ColumnRef::object("t_q"));
    }

    #[test]
    fn test_duplicate_pattern_is_redundant() {
        let tables = tables();
        let mut state = PlanState::new(&tables);
        let mut bindings = Bindings::new();
        let pattern = tp("?x", "<http://ex/p>", "?y");

        assert!(state.bind_pattern(&pattern, &mut bindings).unwrap().is_some());
        assert!(state.bind_pattern(&pattern, &mut bindings).unwrap().is_none());
    }

    #[test]
    fn test_constants_become_pending_conditions() {
        let tables = tables();
        let mut state = PlanState::new(&tables);
        let mut bindings = Bindings::new();

        state
            .bind_pattern(&tp("<http://ex/a>", "<http://ex/p>", "\"v\""), &mut bindings)
            .unwrap();

        assert!(bindings.is_empty());
        assert_eq!(
            render(&state.take_pending("t_p")),
            vec!["t_p.s = '<http://ex/a>'", "t_p.o = '\"v\"'"]
        );
        assert!(state.take_pending("t_p").is_empty());
    }

    #[test]
    fn test_repeated_variable_in_one_pattern() {
        let tables = tables();
        let mut state = PlanState::new(&tables);
        let mut bindings = Bindings::new();

        state
            .bind_pattern(&tp("?x", "<http://ex/p>", "?x"), &mut bindings)
            .unwrap();
        assert_eq!(render(&state.take_pending("t_p")), vec!["t_p.s = t_p.o"]);
    }

    #[test]
    fn test_pending_records_origin() {
        let tables = tables();
        let mut state = PlanState::new(&tables);
        let mut bindings = Bindings::new();

        state
            .bind_pattern(&tp("?x", "<http://ex/p>", "\"a\""), &mut bindings)
            .unwrap();
        state.set_origin(Origin::Optional);
        state
            .bind_pattern(&tp("?x", "<http://ex/q>", "\"b\""), &mut bindings)
            .unwrap();

        let origins: Vec<_> = state.drain_pending().into_iter().map(|(o, _)| o).collect();
        assert_eq!(origins, vec![Origin::Required, Origin::Optional]);
        assert!(state.drain_pending().is_empty());
    }

    #[test]
    fn test_is_bound() {
        let mut bindings = Bindings::new();
        bindings.insert("x".into(), ColumnRef::subject("t"));

        assert!(is_bound(&NodePattern::parse("?x").unwrap(), &bindings));
        assert!(!is_bound(&NodePattern::parse("?y").unwrap(), &bindings));
        assert!(is_bound(&NodePattern::parse("\"c\"").unwrap(), &bindings));
    }
}
