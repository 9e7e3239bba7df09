//! H2 dialect.

use super::SqlDialect;

/// H2 SQL dialect. Standard literal quoting.
#[derive(Debug, Clone, Copy)]
pub struct H2;

impl SqlDialect for H2 {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn backslash_escape(&self) -> bool {
        false
    }
}
