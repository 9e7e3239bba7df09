//! Generic SQL-92 dialect.
//!
//! Used when the caller only knows whether the target engine escapes
//! backslashes in string literals.

use super::SqlDialect;

/// Vendor-neutral SQL-92 with an explicit backslash policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sql92 {
    pub backslash_escape: bool,
}

impl SqlDialect for Sql92 {
    fn name(&self) -> &'static str {
        if self.backslash_escape {
            "sql92-backslash"
        } else {
            "sql92"
        }
    }

    fn backslash_escape(&self) -> bool {
        self.backslash_escape
    }
}
