//! Oracle dialect.

use super::SqlDialect;

/// Oracle SQL dialect. Standard literal quoting.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn backslash_escape(&self) -> bool {
        false
    }
}
