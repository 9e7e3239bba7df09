//! MySQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backslash is an escape character inside string literals unless
//!   `NO_BACKSLASH_ESCAPES` is set, so it is always doubled

use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn backslash_escape(&self) -> bool {
        true
    }
}
