//! Predicate-to-table mapping.
//!
//! The compiler never creates or inspects tables. It only asks a
//! [`TableManager`] which physical table backs a predicate and which
//! predicates are mapped at all.

use indexmap::IndexMap;

use crate::rdf::IriRef;

/// Read-only view of the MPT schema.
///
/// Implementations must be safe to share between compilers running on
/// different threads.
pub trait TableManager: Send + Sync {
    /// Physical table holding the `(s, o)` pairs of `predicate`, if any.
    fn table_for(&self, predicate: &IriRef) -> Option<String>;

    /// Every mapped predicate, in a stable order.
    fn predicates(&self) -> Vec<IriRef>;
}

/// A fixed mapping held in memory, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTableManager {
    tables: IndexMap<IriRef, String>,
}

impl InMemoryTableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `predicate` to `table`, replacing any previous mapping.
    pub fn insert(&mut self, predicate: IriRef, table: impl Into<String>) -> Option<String> {
        self.tables.insert(predicate, table.into())
    }

    pub fn with_table(mut self, predicate: IriRef, table: impl Into<String>) -> Self {
        self.insert(predicate, table);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableManager for InMemoryTableManager {
    fn table_for(&self, predicate: &IriRef) -> Option<String> {
        self.tables.get(predicate).cloned()
    }

    fn predicates(&self) -> Vec<IriRef> {
        self.tables.keys().cloned().collect()
    }
}

impl FromIterator<(IriRef, String)> for InMemoryTableManager {
    fn from_iter<I: IntoIterator<Item = (IriRef, String)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
