//! Graph query AST.
//!
//! A [`GraphQuery`] is two ordered lists of [`QueryElement`]s: required
//! elements are inner-joined, optional elements are left-outer-joined onto
//! the required ones. Every element is currently a [`GraphPattern`]; nested
//! queries are representable but rejected by the planner.

pub mod document;

use std::fmt;

use indexmap::IndexSet;

use crate::planner::ArgumentError;
use crate::rdf::{NodePattern, TriplePattern, Variable};

// =============================================================================
// Filters
// =============================================================================

/// A relational constraint `lhs op rhs` where at least one side is a variable.
///
/// The operator is carried into SQL verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeFilter {
    lhs: NodePattern,
    op: String,
    rhs: NodePattern,
}

impl NodeFilter {
    pub fn new(
        lhs: impl Into<NodePattern>,
        op: impl Into<String>,
        rhs: impl Into<NodePattern>,
    ) -> Result<Self, ArgumentError> {
        let (lhs, op, rhs) = (lhs.into(), op.into(), rhs.into());
        if !lhs.is_variable() && !rhs.is_variable() {
            return Err(ArgumentError::FilterWithoutVariable {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            });
        }
        Ok(Self {
            lhs,
            op: op.trim().to_string(),
            rhs,
        })
    }

    pub fn lhs(&self) -> &NodePattern {
        &self.lhs
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn rhs(&self) -> &NodePattern {
        &self.rhs
    }

    /// Variables referenced by the filter, left side first.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.lhs.variable().into_iter().chain(self.rhs.variable())
    }
}

impl fmt::Display for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FILTER({} {} {})", self.lhs, self.op, self.rhs)
    }
}

// =============================================================================
// Graph pattern
// =============================================================================

/// A conjunction of triple patterns plus filters over their variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphPattern {
    triples: Vec<TriplePattern>,
    filters: IndexSet<NodeFilter>,
}

impl GraphPattern {
    pub fn new(triples: Vec<TriplePattern>) -> Self {
        Self {
            triples,
            filters: IndexSet::new(),
        }
    }

    pub fn with_triple(mut self, triple: TriplePattern) -> Self {
        self.triples.push(triple);
        self
    }

    pub fn with_filter(mut self, filter: NodeFilter) -> Self {
        self.filters.insert(filter);
        self
    }

    pub fn push_triple(&mut self, triple: TriplePattern) {
        self.triples.push(triple);
    }

    pub fn push_filter(&mut self, filter: NodeFilter) {
        self.filters.insert(filter);
    }

    pub fn triples(&self) -> &[TriplePattern] {
        &self.triples
    }

    pub fn filters(&self) -> impl Iterator<Item = &NodeFilter> {
        self.filters.iter()
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for t in &self.triples {
            write!(f, " {}", t)?;
        }
        for filter in &self.filters {
            write!(f, " {}", filter)?;
        }
        write!(f, " }}")
    }
}

// =============================================================================
// Query elements
// =============================================================================

/// Discriminator for [`QueryElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    GraphPattern,
    GraphQuery,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::GraphPattern => write!(f, "graph pattern"),
            ElementKind::GraphQuery => write!(f, "graph query"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryElement {
    Pattern(GraphPattern),
    /// Nested query. Reserved: the planner rejects it.
    Query(Box<GraphQuery>),
}

impl QueryElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            QueryElement::Pattern(_) => ElementKind::GraphPattern,
            QueryElement::Query(_) => ElementKind::GraphQuery,
        }
    }
}

impl From<GraphPattern> for QueryElement {
    fn from(p: GraphPattern) -> Self {
        QueryElement::Pattern(p)
    }
}

impl From<GraphQuery> for QueryElement {
    fn from(q: GraphQuery) -> Self {
        QueryElement::Query(Box::new(q))
    }
}

impl fmt::Display for QueryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryElement::Pattern(p) => write!(f, "{}", p),
            QueryElement::Query(q) => write!(f, "{}", q),
        }
    }
}

// =============================================================================
// Graph query
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphQuery {
    required: Vec<QueryElement>,
    optional: Vec<QueryElement>,
}

impl GraphQuery {
    pub fn new(required: Vec<QueryElement>, optional: Vec<QueryElement>) -> Self {
        Self { required, optional }
    }

    pub fn with_required(mut self, element: impl Into<QueryElement>) -> Self {
        self.required.push(element.into());
        self
    }

    pub fn with_optional(mut self, element: impl Into<QueryElement>) -> Self {
        self.optional.push(element.into());
        self
    }

    pub fn required(&self) -> &[QueryElement] {
        &self.required
    }

    pub fn optional(&self) -> &[QueryElement] {
        &self.optional
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}

impl fmt::Display for GraphQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for e in &self.required {
            write!(f, " {}", e)?;
        }
        for e in &self.optional {
            write!(f, " OPTIONAL {}", e)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Node;

    fn var(name: &str) -> NodePattern {
        NodePattern::var(name).unwrap()
    }

    #[test]
    fn test_filter_requires_variable() {
        assert!(NodeFilter::new(var("o"), ">", Node::plain("5")).is_ok());
        assert!(NodeFilter::new(Node::plain("5"), "<", var("o")).is_ok());

        let err = NodeFilter::new(Node::plain("a"), "=", Node::plain("b")).unwrap_err();
        assert!(matches!(err, ArgumentError::FilterWithoutVariable { .. }));
    }

    #[test]
    fn test_filter_variables() {
        let f = NodeFilter::new(var("a"), "!=", var("b")).unwrap();
        let names: Vec<_> = f.variables().map(|v| v.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(f.to_string(), "FILTER(?a != ?b)");
    }

    #[test]
    fn test_filters_are_a_set() {
        let f = NodeFilter::new(var("o"), ">", Node::plain("5")).unwrap();
        let p = GraphPattern::default()
            .with_filter(f.clone())
            .with_filter(f);
        assert_eq!(p.filters().count(), 1);
    }

    #[test]
    fn test_triples_are_a_multiset() {
        let tp = TriplePattern::parse("?s", "<http://ex/p>", "?o").unwrap();
        let p = GraphPattern::new(vec![tp.clone()]).with_triple(tp);
        assert_eq!(p.triples().len(), 2);
    }

    #[test]
    fn test_element_kind() {
        let q = GraphQuery::default().with_required(GraphPattern::default());
        assert_eq!(q.required()[0].kind(), ElementKind::GraphPattern);

        let nested = GraphQuery::default().with_optional(q);
        assert_eq!(nested.optional()[0].kind(), ElementKind::GraphQuery);
        assert!(!nested.is_empty());
        assert!(GraphQuery::default().is_empty());
    }

    #[test]
    fn test_display() {
        let tp = TriplePattern::parse("?s", "<http://ex/p>", "?o").unwrap();
        let q = GraphQuery::default()
            .with_required(GraphPattern::new(vec![tp.clone()]))
            .with_optional(GraphPattern::new(vec![tp]));
        assert_eq!(
            q.to_string(),
            "{ { ?s <http://ex/p> ?o . } OPTIONAL { ?s <http://ex/p> ?o . } }"
        );
    }
}
