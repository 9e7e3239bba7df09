//! # mptsql
//!
//! Compiles graph-pattern queries over RDF into SQL for a multiple
//! predicate table (MPT) layout, where each predicate is stored in its own
//! two-column table `(s, o)` of N-Triples text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        GraphQuery (required + optional patterns)         │
//! │      triple patterns, filters, targets, ordering         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolver + binder]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Aliased predicate tables, variable → column bindings   │
//! │           pending conditions per table alias             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │     JoinSequence (JOIN / LEFT OUTER JOIN ... ON ...)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │          SELECT ... FROM ... WHERE ... ORDER BY          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod planner;
pub mod query;
pub mod rdf;
pub mod sql;
pub mod tables;

pub use sql::dialect;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile_query, CompileOutput, QueryCompiler};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::planner::{ArgumentError, QueryError};
    pub use crate::query::{GraphPattern, GraphQuery, NodeFilter, QueryElement};
    pub use crate::rdf::{IriRef, Node, NodePattern, PredicatePattern, TriplePattern, Variable};
    pub use crate::tables::{InMemoryTableManager, TableManager};
}

// Also export at crate root for convenience
pub use compile::QueryCompiler;
pub use dialect::Dialect;
