//! Apache Derby dialect.
//!
//! Derby follows the SQL standard for string literals: only `'` needs
//! escaping, backslash is an ordinary character.

use super::SqlDialect;

/// Apache Derby SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Derby;

impl SqlDialect for Derby {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn backslash_escape(&self) -> bool {
        false
    }
}
