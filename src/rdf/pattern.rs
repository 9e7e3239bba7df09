//! Triple patterns: triples whose positions may hold variables.

use std::fmt;

use super::ntriples::{self, ParseError};
use super::{IriRef, Node, TermError};

/// A query variable, written `?name` in surface syntax.
///
/// The stored name never carries the `?` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Create a variable. A leading `?` is accepted and stripped.
    pub fn new(name: &str) -> Result<Self, TermError> {
        let bare = name.strip_prefix('?').unwrap_or(name);
        if bare.is_empty() || !bare.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(TermError::InvalidVariable(name.to_string()));
        }
        Ok(Self(bare.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Error raised when reading a pattern term from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermSyntaxError {
    #[error(transparent)]
    Lexical(#[from] ParseError),

    #[error(transparent)]
    Term(#[from] TermError),
}

// =============================================================================
// Node patterns
// =============================================================================

/// A subject or object position: a variable or a concrete node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePattern {
    Variable(Variable),
    Node(Node),
}

impl NodePattern {
    /// Read a term: `?name` for a variable, otherwise an N-Triples node.
    pub fn parse(term: &str) -> Result<Self, TermSyntaxError> {
        if term.starts_with('?') {
            Ok(NodePattern::Variable(Variable::new(term)?))
        } else {
            Ok(NodePattern::Node(ntriples::parse_node(term)?))
        }
    }

    pub fn var(name: &str) -> Result<Self, TermError> {
        Ok(NodePattern::Variable(Variable::new(name)?))
    }

    pub fn variable(&self) -> Option<&Variable> {
        match self {
            NodePattern::Variable(v) => Some(v),
            NodePattern::Node(_) => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, NodePattern::Variable(_))
    }
}

impl From<Node> for NodePattern {
    fn from(node: Node) -> Self {
        NodePattern::Node(node)
    }
}

impl From<IriRef> for NodePattern {
    fn from(iri: IriRef) -> Self {
        NodePattern::Node(Node::Iri(iri))
    }
}

impl From<Variable> for NodePattern {
    fn from(var: Variable) -> Self {
        NodePattern::Variable(var)
    }
}

impl fmt::Display for NodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePattern::Variable(v) => write!(f, "{}", v),
            NodePattern::Node(n) => write!(f, "{}", n),
        }
    }
}

/// A predicate position: a variable or an IRI. Literals cannot appear here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicatePattern {
    Variable(Variable),
    Iri(IriRef),
}

impl PredicatePattern {
    /// Read a predicate term: `?name` or `<iri>`.
    pub fn parse(term: &str) -> Result<Self, TermSyntaxError> {
        if term.starts_with('?') {
            Ok(PredicatePattern::Variable(Variable::new(term)?))
        } else {
            Ok(PredicatePattern::Iri(ntriples::parse_iri(term)?))
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, PredicatePattern::Variable(_))
    }
}

impl From<IriRef> for PredicatePattern {
    fn from(iri: IriRef) -> Self {
        PredicatePattern::Iri(iri)
    }
}

impl From<Variable> for PredicatePattern {
    fn from(var: Variable) -> Self {
        PredicatePattern::Variable(var)
    }
}

impl fmt::Display for PredicatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicatePattern::Variable(v) => write!(f, "{}", v),
            PredicatePattern::Iri(iri) => write!(f, "{}", iri),
        }
    }
}

// =============================================================================
// Triple pattern
// =============================================================================

/// A triple whose positions may be variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: NodePattern,
    pub predicate: PredicatePattern,
    pub object: NodePattern,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<NodePattern>,
        predicate: impl Into<PredicatePattern>,
        object: impl Into<NodePattern>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Read a pattern from three terms, e.g. `("?s", "<http://ex/p>", "\"v\"")`.
    pub fn parse(subject: &str, predicate: &str, object: &str) -> Result<Self, TermSyntaxError> {
        Ok(Self {
            subject: NodePattern::parse(subject)?,
            predicate: PredicatePattern::parse(predicate)?,
            object: NodePattern::parse(object)?,
        })
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
