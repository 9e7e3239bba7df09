//! Query documents: a TOML or JSON description of a graph query.
//!
//! Terms use N-Triples syntax, or `?name` for variables:
//!
//! ```toml
//! targets = ["?s", "?o"]
//! order_by = { target = "?s", desc = true }
//!
//! [[required]]
//! triples = [["?s", "<http://example.org/p>", "?o"]]
//! filters = [["?o", ">", "\"5\""]]
//!
//! [[optional]]
//! triples = [["?s", "<http://example.org/q>", "?label"]]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GraphPattern, GraphQuery, NodeFilter, QueryElement};
use crate::planner::ArgumentError;
use crate::rdf::{NodePattern, TermSyntaxError, TriplePattern};

/// Error type for query documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Query file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read query file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML query: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse JSON query: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid term in {section}[{index}]: {source}")]
    Term {
        section: &'static str,
        index: usize,
        #[source]
        source: TermSyntaxError,
    },

    #[error("Invalid filter in {section}[{index}]: {source}")]
    Filter {
        section: &'static str,
        index: usize,
        #[source]
        source: ArgumentError,
    },
}

/// Ordering requested by a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderSpec {
    pub target: String,
    #[serde(default)]
    pub desc: bool,
}

/// One graph pattern: `[subject, predicate, object]` triples and
/// `[lhs, operator, rhs]` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSpec {
    pub triples: Vec<[String; 3]>,
    pub filters: Vec<[String; 3]>,
}

/// Root document structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryDocument {
    pub targets: Vec<String>,
    pub order_by: Option<OrderSpec>,
    pub required: Vec<PatternSpec>,
    pub optional: Vec<PatternSpec>,
}

impl QueryDocument {
    pub fn from_toml_str(content: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a document. Files ending in `.json` are read as JSON, anything
    /// else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Build the graph query described by this document.
    pub fn to_query(&self) -> Result<GraphQuery, DocumentError> {
        let required = build_elements("required", &self.required)?;
        let optional = build_elements("optional", &self.optional)?;
        Ok(GraphQuery::new(required, optional))
    }

    /// The ordering as `(target, desc)`.
    pub fn ordering(&self) -> Option<(&str, bool)> {
        self.order_by
            .as_ref()
            .map(|o| (o.target.as_str(), o.desc))
    }
}

fn build_elements(
    section: &'static str,
    specs: &[PatternSpec],
) -> Result<Vec<QueryElement>, DocumentError> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| build_pattern(section, index, spec).map(QueryElement::from))
        .collect()
}

fn build_pattern(
    section: &'static str,
    index: usize,
    spec: &PatternSpec,
) -> Result<GraphPattern, DocumentError> {
    let term_err = |source| DocumentError::Term {
        section,
        index,
        source,
    };

    let mut pattern = GraphPattern::default();
    for [s, p, o] in &spec.triples {
        pattern.push_triple(TriplePattern::parse(s, p, o).map_err(term_err)?);
    }
    for [lhs, op, rhs] in &spec.filters {
        let lhs = NodePattern::parse(lhs).map_err(term_err)?;
        let rhs = NodePattern::parse(rhs).map_err(term_err)?;
        let filter = NodeFilter::new(lhs, op.as_str(), rhs).map_err(|source| {
            DocumentError::Filter {
                section,
                index,
                source,
            }
        })?;
        pattern.push_filter(filter);
    }
    Ok(pattern)
}
