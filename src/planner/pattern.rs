//! Join planning for a single graph pattern.
//!
//! The first pattern that binds becomes the seed. Each later step is the
//! first remaining pattern that shares a bound variable (or a constant) with
//! what has been joined so far, attached by an inner join whose ON clause
//! collects:
//!
//! 1. equalities between a variable's bound column and its column here
//! 2. filters whose variables are now all available
//! 3. pending constant conditions on the new table
//!
//! Filters left over once every triple is placed can only be attached to a
//! pattern with a single triple; they become pending conditions on it and
//! end up in the WHERE clause.

use tracing::{debug, info, warn};

use super::binder::{is_bound, Bindings, PlanState};
use super::{ArgumentError, QueryError};
use crate::query::{GraphPattern, NodeFilter};
use crate::rdf::{NodePattern, TriplePattern, Variable};
use crate::sql::{ColumnRef, Condition, JoinConditions, JoinSequence, JoinTable, JoinType, Operand};

/// Plan one graph pattern into a join sequence.
///
/// Returns `None` when every triple in the pattern was already planned.
pub(crate) fn plan_pattern(
    state: &mut PlanState<'_>,
    pattern: &GraphPattern,
    bindings: &mut Bindings,
) -> Result<Option<JoinSequence>, QueryError> {
    debug!(%pattern, "planning graph pattern");

    let mut filters: Vec<&NodeFilter> = pattern.filters().collect();
    let mut steps: Vec<&TriplePattern> = pattern.triples().iter().collect();

    let mut seed = None;
    while !steps.is_empty() {
        let step = steps.remove(0);
        if let Some(table) = state.bind_pattern(step, bindings)? {
            seed = Some((step, table));
            break;
        }
    }

    let Some((seed_pattern, seed_table)) = seed else {
        info!(%pattern, "pattern is entirely redundant, ignoring");
        return Ok(None);
    };

    let mut joins = JoinSequence::new(JoinTable::new(
        seed_table.name(),
        seed_table.alias(),
        seed_pattern,
    ));
    let mut planned = 1;

    while !steps.is_empty() {
        let Some(index) = steps
            .iter()
            .position(|tp| is_bound(&tp.subject, bindings) || is_bound(&tp.object, bindings))
        else {
            return Err(QueryError::CannotBindAllSteps {
                remaining: join_display(steps.iter()),
                bound: bindings
                    .keys()
                    .map(|k| format!("?{}", k))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };
        let step = steps.remove(index);

        let Some(table) = state.bind_pattern(step, bindings)? else {
            continue;
        };
        let alias = table.alias();
        let mut conditions = JoinConditions::new();

        for (node, column) in [
            (&step.subject, ColumnRef::subject(alias)),
            (&step.object, ColumnRef::object(alias)),
        ] {
            let Some(bound) = node.variable().and_then(|v| bindings.get(v.name())) else {
                continue;
            };
            if *bound != column {
                let condition = Condition::equals(bound.clone(), column);
                debug!(%condition, "join condition");
                state.remove_pending(alias, &condition);
                conditions.add(condition);
            }
        }

        let join_table = JoinTable::new(table.name(), alias, step);
        let mut joinable: Vec<String> = joins.join_vars().into_iter().map(|v| v.name).collect();
        joinable.extend(join_table.join_vars().iter().map(|v| v.name.clone()));

        let mut i = 0;
        while i < filters.len() {
            let filter = filters[i];
            let ready = filter.variables().all(|v| bindings.contains_key(v.name()))
                && filter
                    .variables()
                    .any(|v| joinable.iter().any(|j| j == v.name()));
            if !ready {
                i += 1;
                continue;
            }
            if filter.variables().count() == 2 {
                warn!(%filter, "both filter operands are variables");
            }
            let condition = filter_condition(filter, bindings)?;
            debug!(%condition, "filter condition");
            conditions.add(condition);
            filters.remove(i);
        }

        conditions.extend(state.take_pending(alias));
        joins.add_join(JoinType::Inner, join_table, &conditions);
        planned += 1;
    }

    if !filters.is_empty() {
        if planned > 1 {
            return Err(QueryError::FilterUnbound(join_display(filters.iter())));
        }
        for filter in filters {
            attach_filter(state, seed_pattern, seed_table.alias(), filter)?;
        }
    }

    Ok(Some(joins))
}

fn join_display<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}

fn operand(node: &NodePattern, bindings: &Bindings) -> Result<Operand, QueryError> {
    match node {
        NodePattern::Variable(v) => bindings
            .get(v.name())
            .cloned()
            .map(Operand::Column)
            .ok_or_else(|| QueryError::FilterVariableNotFound(v.to_string())),
        NodePattern::Node(n) => Ok(Operand::Value(n.to_string())),
    }
}

fn filter_condition(filter: &NodeFilter, bindings: &Bindings) -> Result<Condition, QueryError> {
    Ok(Condition::new(
        operand(filter.lhs(), bindings)?,
        filter.op(),
        operand(filter.rhs(), bindings)?,
    ))
}

/// Column of `var` within the single planned triple.
fn seed_column(
    pattern: &TriplePattern,
    alias: &str,
    var: &Variable,
) -> Result<ColumnRef, QueryError> {
    if pattern.subject.variable() == Some(var) {
        Ok(ColumnRef::subject(alias))
    } else if pattern.object.variable() == Some(var) {
        Ok(ColumnRef::object(alias))
    } else {
        Err(QueryError::FilterVariableNotFound(var.to_string()))
    }
}

fn attach_filter(
    state: &mut PlanState<'_>,
    pattern: &TriplePattern,
    alias: &str,
    filter: &NodeFilter,
) -> Result<(), QueryError> {
    let condition = match (filter.lhs(), filter.rhs()) {
        (NodePattern::Variable(_), NodePattern::Variable(_)) => {
            warn!(%filter, "both filter operands are variables, filter not applied");
            return Ok(());
        }
        (NodePattern::Variable(v), NodePattern::Node(n)) => Condition::new(
            seed_column(pattern, alias, v)?,
            filter.op(),
            Operand::Value(n.to_string()),
        ),
        (NodePattern::Node(n), NodePattern::Variable(v)) => Condition::new(
            Operand::Value(n.to_string()),
            filter.op(),
            seed_column(pattern, alias, v)?,
        ),
        (NodePattern::Node(l), NodePattern::Node(r)) => {
            return Err(ArgumentError::FilterWithoutVariable {
                lhs: l.to_string(),
                rhs: r.to_string(),
            }
            .into());
        }
    };

    debug!(%condition, "filter attached to single pattern");
    state.add_pending(alias, condition);
    Ok(())
}
