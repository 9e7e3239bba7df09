//! Configuration module for mptsql.
//!
//! Handles the predicate-to-table mapping, the target dialect and
//! environment variables.

mod settings;

pub use settings::{expand_env_vars, Settings, SettingsError};
