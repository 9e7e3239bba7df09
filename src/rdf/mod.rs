//! RDF value model.
//!
//! Concrete RDF nodes and the pattern types the query planner works with:
//!
//! - [`IriRef`] - a validated absolute IRI
//! - [`Node`] - IRI, plain literal, language-tagged literal or typed literal
//! - [`Triple`] - a fully concrete statement
//! - [`NodePattern`] / [`PredicatePattern`] / [`TriplePattern`] - the same
//!   positions, with variables allowed
//!
//! The canonical serialisation of every node is N-Triples, produced through
//! [`ntriples::escape`].

pub mod ntriples;
mod pattern;

pub use ntriples::{ParseError, ParseErrorKind};
pub use pattern::{NodePattern, PredicatePattern, TermSyntaxError, TriplePattern, Variable};

use std::fmt;
use std::hash::{Hash, Hasher};

/// Errors raised by value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    #[error("Not an absolute IRI <{iri}>: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("Language tag must not be empty")]
    EmptyLanguageTag,

    #[error("Invalid variable name '{0}'")]
    InvalidVariable(String),
}

// =============================================================================
// IRI reference
// =============================================================================

/// An absolute IRI, validated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IriRef(String);

impl IriRef {
    pub fn new(iri: impl Into<String>) -> Result<Self, TermError> {
        let iri = iri.into();
        match oxiri::Iri::parse(iri.as_str()) {
            Ok(_) => Ok(Self(iri)),
            Err(e) => Err(TermError::InvalidIri {
                reason: e.to_string(),
                iri,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

// =============================================================================
// Language tag
// =============================================================================

/// A non-empty language tag.
///
/// The original case is kept for display; equality and hashing ignore case.
#[derive(Debug, Clone, Eq)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Result<Self, TermError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(TermError::EmptyLanguageTag);
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for LanguageTag {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for LanguageTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Node
// =============================================================================

/// A concrete RDF node.
///
/// Lexical forms hold the unescaped value; any code point is legal in memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(IriRef),
    PlainLiteral(String),
    LanguageLiteral { lexical: String, language: LanguageTag },
    TypedLiteral { lexical: String, datatype: IriRef },
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Result<Self, TermError> {
        Ok(Node::Iri(IriRef::new(iri)?))
    }

    pub fn plain(lexical: impl Into<String>) -> Self {
        Node::PlainLiteral(lexical.into())
    }

    pub fn language(lexical: impl Into<String>, tag: impl Into<String>) -> Result<Self, TermError> {
        Ok(Node::LanguageLiteral {
            lexical: lexical.into(),
            language: LanguageTag::new(tag)?,
        })
    }

    pub fn typed(lexical: impl Into<String>, datatype: IriRef) -> Self {
        Node::TypedLiteral {
            lexical: lexical.into(),
            datatype,
        }
    }

    /// The lexical form of a literal, or the IRI text.
    pub fn lexical(&self) -> &str {
        match self {
            Node::Iri(iri) => iri.as_str(),
            Node::PlainLiteral(lexical)
            | Node::LanguageLiteral { lexical, .. }
            | Node::TypedLiteral { lexical, .. } => lexical,
        }
    }
}

impl From<IriRef> for Node {
    fn from(iri: IriRef) -> Self {
        Node::Iri(iri)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "{}", iri),
            Node::PlainLiteral(lexical) => write!(f, "\"{}\"", ntriples::escape(lexical)),
            Node::LanguageLiteral { lexical, language } => {
                write!(f, "\"{}\"@{}", ntriples::escape(lexical), language)
            }
            Node::TypedLiteral { lexical, datatype } => {
                write!(f, "\"{}\"^^{}", ntriples::escape(lexical), datatype)
            }
        }
    }
}

// =============================================================================
// Triple
// =============================================================================

/// A concrete RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: IriRef,
    pub predicate: IriRef,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: IriRef, predicate: IriRef, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
