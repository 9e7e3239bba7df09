//! SQL generation module.
//!
//! This module renders planner output as SQL-92. It includes:
//!
//! - [`select`] - SELECT statement emitter
//! - [`join`] - join sequences, join tables and ON conditions
//! - [`expr`] - column references and conditions
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod join;
pub mod select;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{Column, ColumnRef, Condition, Operand};
pub use join::{JoinConditions, JoinSequence, JoinTable, JoinType, JoinVar, Joinable};
pub use select::{SelectStatement, SortDir, EMPTY_RESULT};
pub use token::{Token, TokenStream};
