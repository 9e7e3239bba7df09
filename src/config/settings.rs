//! TOML-based configuration for mptsql.
//!
//! Supports a config file (mptsql.toml) with environment variable expansion
//! in table names.
//!
//! Example configuration:
//! ```toml
//! dialect = "postgres"
//!
//! [predicates]
//! "<http://example.org/name>" = "t_name"
//! "http://example.org/knows" = "${SCHEMA}.t_knows"
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::rdf::{IriRef, TermError};
use crate::sql::Dialect;
use crate::tables::InMemoryTableManager;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Invalid predicate {iri}: {source}")]
    InvalidPredicate { iri: String, source: TermError },
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// SQL dialect name (derby, h2, postgres, mysql, oracle, sql92, sql92-backslash).
    pub dialect: String,

    /// Predicate IRI to physical table name, in file order.
    pub predicates: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default().to_string(),
            predicates: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MPTSQL_CONFIG`
    /// 2. `./mptsql.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("MPTSQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("mptsql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }

    /// The configured dialect.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        self.dialect
            .parse()
            .map_err(|_| SettingsError::UnsupportedDialect(self.dialect.clone()))
    }

    /// Build the predicate-to-table mapping.
    ///
    /// Predicate keys may be written with or without angle brackets.
    pub fn table_manager(&self) -> Result<InMemoryTableManager, SettingsError> {
        let mut tables = InMemoryTableManager::new();
        for (key, table) in &self.predicates {
            let bare = key
                .strip_prefix('<')
                .and_then(|k| k.strip_suffix('>'))
                .unwrap_or(key);
            let iri = IriRef::new(bare).map_err(|source| SettingsError::InvalidPredicate {
                iri: key.clone(),
                source,
            })?;
            tables.insert(iri, expand_env_vars(table)?);
        }
        Ok(tables)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR ends at the first non-alphanumeric, non-underscore char
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
