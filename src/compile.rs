//! End-to-end compilation from a graph query to SQL.
//!
//! ```text
//! GraphQuery + targets → Planner (per-compile PlanState) → SelectStatement → SQL
//! ```
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mptsql::compile::QueryCompiler;
//! use mptsql::query::{GraphPattern, GraphQuery};
//! use mptsql::rdf::{IriRef, TriplePattern};
//! use mptsql::tables::InMemoryTableManager;
//!
//! let tables = InMemoryTableManager::new()
//!     .with_table(IriRef::new("http://example.org/p")?, "t_p");
//! let query = GraphQuery::default().with_required(GraphPattern::new(vec![
//!     TriplePattern::parse("?s", "<http://example.org/p>", "?o")?,
//! ]));
//!
//! let mut compiler = QueryCompiler::new(&tables, query, false);
//! compiler.set_targets(["s", "o"])?;
//! assert_eq!(compiler.get_sql()?, vec!["SELECT t_p.s, t_p.o FROM t_p"]);
//! # Ok(())
//! # }
//! ```

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::planner::{ArgumentError, Planner, QueryResult};
use crate::query::GraphQuery;
use crate::rdf::Variable;
use crate::sql::{Dialect, SortDir};
use crate::tables::TableManager;

// ============================================================================
// Result Types
// ============================================================================

/// Result of compiling a query, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileOutput {
    /// The generated statements. Always exactly one today.
    pub sql: Vec<String>,

    /// Projected variables, in column order.
    pub targets: Vec<String>,

    /// The dialect used for generation.
    pub dialect: String,
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles one [`GraphQuery`] against a [`TableManager`].
///
/// The compiler holds only the query, the targets and the ordering. Every
/// call to [`get_sql`](Self::get_sql) plans from scratch, so it can be
/// called repeatedly. Use one compiler per thread; the table manager can be
/// shared.
pub struct QueryCompiler<'a> {
    tables: &'a dyn TableManager,
    query: GraphQuery,
    dialect: Dialect,
    targets: Vec<String>,
    ordering: Option<(String, SortDir)>,
}

impl<'a> QueryCompiler<'a> {
    /// Create a compiler emitting plain SQL-92 string literals, with or
    /// without backslash escaping.
    pub fn new(tables: &'a dyn TableManager, query: GraphQuery, backslash_escape: bool) -> Self {
        Self::with_dialect(tables, query, Dialect::Sql92 { backslash_escape })
    }

    pub fn with_dialect(tables: &'a dyn TableManager, query: GraphQuery, dialect: Dialect) -> Self {
        Self {
            tables,
            query,
            dialect,
            targets: Vec::new(),
            ordering: None,
        }
    }

    /// Set the projected variables. Names may carry a leading `?`.
    ///
    /// Clears any ordering.
    pub fn set_targets<I, S>(&mut self, targets: I) -> Result<(), ArgumentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = IndexSet::new();
        for target in targets {
            let var = Variable::new(target.as_ref())?;
            if !seen.insert(var.name().to_string()) {
                return Err(ArgumentError::DuplicateTarget(var.name().to_string()));
            }
        }
        self.targets = seen.into_iter().collect();
        self.ordering = None;
        debug!(targets = ?self.targets, "targets set");
        Ok(())
    }

    /// Order the result by `target`, which must already be a target.
    pub fn order_by(&mut self, target: &str, desc: bool) -> Result<(), ArgumentError> {
        let name = target.strip_prefix('?').unwrap_or(target);
        if !self.targets.iter().any(|t| t == name) {
            return Err(ArgumentError::OrderByNonTarget(name.to_string()));
        }
        self.ordering = Some((name.to_string(), SortDir::from_desc(desc)));
        Ok(())
    }

    /// Copy of the current targets, without `?`.
    pub fn targets(&self) -> Vec<String> {
        self.targets.clone()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Compile the query.
    pub fn get_sql(&self) -> QueryResult<Vec<String>> {
        let ordering = self
            .ordering
            .as_ref()
            .map(|(target, dir)| (target.as_str(), *dir));
        let plan = Planner::new(self.tables).plan(&self.query, &self.targets, ordering)?;
        Ok(vec![plan.to_sql(self.dialect)])
    }
}

// ============================================================================
// Compilation Functions
// ============================================================================

/// Compile `query` in one call.
///
/// `ordering` is `(target, descending)`.
pub fn compile_query<S: AsRef<str>>(
    tables: &dyn TableManager,
    query: GraphQuery,
    targets: &[S],
    ordering: Option<(&str, bool)>,
    dialect: Dialect,
) -> QueryResult<CompileOutput> {
    let mut compiler = QueryCompiler::with_dialect(tables, query, dialect);
    compiler.set_targets(targets)?;
    if let Some((target, desc)) = ordering {
        compiler.order_by(target, desc)?;
    }

    Ok(CompileOutput {
        sql: compiler.get_sql()?,
        targets: compiler.targets(),
        dialect: dialect.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
