//! PostgreSQL dialect.
//!
//! PostgreSQL literal handling:
//! - Single-quoted literals, `''` for an embedded quote
//! - Backslash is treated as an escape character by older servers and by
//!   servers running with `standard_conforming_strings = off`, so it is
//!   always doubled

use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn backslash_escape(&self) -> bool {
        true
    }
}
