//! SQL dialect definitions.
//!
//! The compiler emits vendor-neutral SQL-92. The only construct that differs
//! between the supported engines is string literal quoting: some engines
//! treat `\` as an escape character inside `'...'`, others do not.
//!
//! | Dialect    | Backslash escape |
//! |------------|------------------|
//! | Derby      | no               |
//! | H2         | no               |
//! | PostgreSQL | yes              |
//! | MySQL      | yes              |
//! | Oracle     | no               |
//! | SQL-92     | caller's choice  |
//!
//! # Usage
//!
//! ```
//! use mptsql::sql::dialect::{Dialect, SqlDialect};
//!
//! assert_eq!(Dialect::Postgres.quote_string(r"a\b"), r"'a\\b'");
//! assert_eq!(Dialect::Oracle.quote_string(r"a\b"), r"'a\b'");
//! ```

mod derby;
mod h2;
pub mod helpers;
mod mysql;
mod oracle;
mod postgres;
mod sql92;

pub use derby::Derby;
pub use h2::H2;
pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sql92::Sql92;

use std::str::FromStr;

/// SQL dialect trait - defines how dialect-sensitive constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Whether `\` inside a string literal must be doubled.
    fn backslash_escape(&self) -> bool;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quoted_string(s, self.backslash_escape())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect '{0}' (expected derby, h2, postgres, mysql, oracle or sql92)")]
pub struct UnknownDialect(pub String);

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    Derby,
    H2,
    #[default]
    Postgres,
    MySql,
    Oracle,
    Sql92 { backslash_escape: bool },
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Derby => &Derby,
            Dialect::H2 => &H2,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::Oracle => &Oracle,
            Dialect::Sql92 {
                backslash_escape: true,
            } => &Sql92 {
                backslash_escape: true,
            },
            Dialect::Sql92 {
                backslash_escape: false,
            } => &Sql92 {
                backslash_escape: false,
            },
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn backslash_escape(&self) -> bool {
        self.dialect().backslash_escape()
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "derby" => Ok(Dialect::Derby),
            "h2" => Ok(Dialect::H2),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "oracle" => Ok(Dialect::Oracle),
            "sql92" => Ok(Dialect::Sql92 {
                backslash_escape: false,
            }),
            "sql92-backslash" => Ok(Dialect::Sql92 {
                backslash_escape: true,
            }),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
