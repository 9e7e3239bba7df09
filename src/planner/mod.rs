//! Query planner - converts a [`GraphQuery`] into one SELECT statement.
//!
//! Planning walks the query in two passes:
//! 1. Required elements: each graph pattern is planned into a join sequence
//!    ([`pattern`]); the first becomes the main sequence and later ones are
//!    inner-joined onto it through shared variables.
//! 2. Optional elements: each is planned against a scratch copy of the
//!    required bindings and left-outer-joined onto the main sequence, so
//!    every optional joins against required columns only.
//!
//! Remaining pending conditions become the WHERE clause.

pub mod binder;
mod pattern;
pub mod resolver;

pub use binder::{Bindings, Origin, PlanState};
pub use resolver::{MpTable, TableResolver, EMPTY_RELATION};

use thiserror::Error;
use tracing::{debug, info};

use crate::query::{GraphPattern, GraphQuery, QueryElement};
use crate::rdf::TermError;
use crate::sql::{
    Condition, Dialect, JoinSequence, JoinType, Joinable, SelectStatement, SortDir, EMPTY_RESULT,
};
use crate::tables::TableManager;

/// Programmer misuse of the query API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Predicate must not be a variable: {0}")]
    VariablePredicate(String),

    #[error("Cannot order by '{0}': not a target")]
    OrderByNonTarget(String),

    #[error("Filters must contain a variable; neither {lhs} nor {rhs} is a variable")]
    FilterWithoutVariable { lhs: String, rhs: String },

    #[error("Duplicate target '{0}'")]
    DuplicateTarget(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] TermError),
}

/// Errors that make a query impossible to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Subqueries are not supported")]
    UnsupportedSubquery,

    #[error("Cannot bind all query steps; remaining: {remaining}; variables already bound: {bound}")]
    CannotBindAllSteps { remaining: String, bound: String },

    #[error("Filter is unbound: {0}")]
    FilterUnbound(String),

    #[error("Variable {0} in filter cannot be found in graph pattern")]
    FilterVariableNotFound(String),

    #[error("Target '?{0}' is not bound by any pattern")]
    UnmappedTarget(String),

    #[error("No targets set")]
    NoTargets,

    #[error("Optional element has no required element to join against")]
    OptionalWithoutRequired,

    #[error("Condition from an optional element would be applied in WHERE: {0}")]
    OptionalConditionInWhere(String),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Result of planning.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The query had no patterns to join.
    Empty,
    Select(SelectStatement),
}

impl Plan {
    pub fn to_sql(&self, dialect: Dialect) -> String {
        match self {
            Plan::Empty => EMPTY_RESULT.to_string(),
            Plan::Select(stmt) => stmt.to_sql(dialect),
        }
    }
}

/// Main entry point for planning.
pub struct Planner<'a> {
    tables: &'a dyn TableManager,
}

impl<'a> Planner<'a> {
    pub fn new(tables: &'a dyn TableManager) -> Self {
        Self { tables }
    }

    /// Plan `query`, projecting `targets` (bare variable names) in order.
    pub fn plan(
        &self,
        query: &GraphQuery,
        targets: &[String],
        ordering: Option<(&str, SortDir)>,
    ) -> QueryResult<Plan> {
        let mut state = PlanState::new(self.tables);
        let mut required_bindings = Bindings::new();
        let mut main: Option<JoinSequence> = None;

        for element in query.required() {
            debug!(%element, "processing required element");
            let Some(sub) =
                pattern::plan_pattern(&mut state, as_pattern(element)?, &mut required_bindings)?
            else {
                info!("skipping join");
                continue;
            };

            match main.as_mut() {
                None => main = Some(sub),
                Some(seq) => {
                    let sub = Joinable::from(sub);
                    let on = seq.binding_conditions(&sub, &required_bindings);
                    seq.add_join(JoinType::Inner, sub, &on);
                }
            }
        }

        let mut all_bindings = required_bindings.clone();
        state.set_origin(Origin::Optional);

        for element in query.optional() {
            debug!(%element, "processing optional element");
            let pattern = as_pattern(element)?;
            let Some(seq) = main.as_mut() else {
                return Err(QueryError::OptionalWithoutRequired);
            };

            let mut scratch = required_bindings.clone();
            let Some(sub) = pattern::plan_pattern(&mut state, pattern, &mut scratch)? else {
                info!("skipping join");
                continue;
            };

            let sub = Joinable::from(sub);
            let mut on = seq.binding_conditions(&sub, &required_bindings);
            for alias in sub.aliases() {
                on.extend(state.take_pending(alias));
            }
            seq.add_join(JoinType::LeftOuter, sub, &on);

            for (name, column) in scratch {
                all_bindings.entry(name).or_insert(column);
            }
        }

        let Some(main) = main else {
            return Ok(Plan::Empty);
        };

        if targets.is_empty() {
            return Err(QueryError::NoTargets);
        }

        let projection = targets
            .iter()
            .map(|t| {
                all_bindings
                    .get(t)
                    .cloned()
                    .ok_or_else(|| QueryError::UnmappedTarget(t.clone()))
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let mut stmt = SelectStatement::new(&main).select(projection);
        for condition in residual_conditions(&mut state)? {
            debug!(%condition, "adding remaining condition to WHERE");
            stmt = stmt.filter(condition);
        }

        if let Some((target, dir)) = ordering {
            let column = all_bindings
                .get(target)
                .ok_or_else(|| QueryError::UnmappedTarget(target.to_string()))?;
            stmt = stmt.order_by(column.clone(), dir);
        }

        Ok(Plan::Select(stmt))
    }
}

fn as_pattern(element: &QueryElement) -> QueryResult<&GraphPattern> {
    match element {
        QueryElement::Pattern(p) => Ok(p),
        QueryElement::Query(_) => Err(QueryError::UnsupportedSubquery),
    }
}

/// Every pending condition, which must all come from required elements.
fn residual_conditions(state: &mut PlanState<'_>) -> QueryResult<Vec<Condition>> {
    state
        .drain_pending()
        .into_iter()
        .map(|(origin, condition)| match origin {
            Origin::Required => Ok(condition),
            Origin::Optional => Err(QueryError::OptionalConditionInWhere(condition.to_string())),
        })
        .collect()
}
