//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that emitted SQL is syntactically correct
//! using sqlparser-rs.

use sqlparser::dialect::{GenericDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

/// Validates that a SQL string is syntactically valid for the given dialect.
///
/// sqlparser has no Derby, H2 or Oracle dialect; those are checked with the
/// generic one.
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Derby | Dialect::H2 | Dialect::Oracle | Dialect::Sql92 { .. } => {
            Box::new(GenericDialect {})
        }
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT t.s FROM t", Dialect::Postgres).unwrap();
        validate_sql("SELECT t.s FROM t", Dialect::MySql).unwrap();
        validate_sql("SELECT t.s FROM t", Dialect::Oracle).unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC t.s FORM t", Dialect::Postgres);
        assert!(result.is_err());
    }
}
