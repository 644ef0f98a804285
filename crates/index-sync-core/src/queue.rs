//! Pending operation queues.
//!
//! Holds everything routed since the last successful commit of each kind.
//! Queues are append-only and keep duplicates; a queue is emptied only
//! when its bulk operation succeeds.

use serde::{Deserialize, Serialize};

use crate::identifier::DocumentId;

/// Kind of pending index operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

impl OperationKind {
    /// Fixed commit order: inserts, then updates, then deletes.
    pub const COMMIT_ORDER: [OperationKind; 3] = [
        OperationKind::Insert,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    /// Label of the bulk operation used in diagnostics.
    pub fn operation_label(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert_many",
            OperationKind::Update => "replace_many",
            OperationKind::Delete => "delete_many_by_ids",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Insert => write!(f, "insert"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// The three pending sets of one sync engine.
#[derive(Debug)]
pub struct PendingQueues<E> {
    insertions: Vec<E>,
    updates: Vec<E>,
    deletions: Vec<DocumentId>,
}

impl<E> Default for PendingQueues<E> {
    fn default() -> Self {
        Self {
            insertions: Vec::new(),
            updates: Vec::new(),
            deletions: Vec::new(),
        }
    }
}

impl<E> PendingQueues<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_insertion(&mut self, entity: E) {
        self.insertions.push(entity);
    }

    pub fn push_update(&mut self, entity: E) {
        self.updates.push(entity);
    }

    pub fn push_deletion(&mut self, id: DocumentId) {
        self.deletions.push(id);
    }

    pub fn insertions(&self) -> &[E] {
        &self.insertions
    }

    pub fn updates(&self) -> &[E] {
        &self.updates
    }

    pub fn deletions(&self) -> &[DocumentId] {
        &self.deletions
    }

    /// Number of pending items of one kind.
    pub fn len_of(&self, kind: OperationKind) -> usize {
        match kind {
            OperationKind::Insert => self.insertions.len(),
            OperationKind::Update => self.updates.len(),
            OperationKind::Delete => self.deletions.len(),
        }
    }

    /// Empty one kind's queue. Only called after its commit succeeded.
    pub fn clear(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Insert => self.insertions.clear(),
            OperationKind::Update => self.updates.clear(),
            OperationKind::Delete => self.deletions.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.updates.is_empty() && self.deletions.is_empty()
    }

    /// Total pending items across all kinds.
    pub fn total(&self) -> usize {
        self.insertions.len() + self.updates.len() + self.deletions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_order_and_labels() {
        let labels: Vec<_> = OperationKind::COMMIT_ORDER
            .iter()
            .map(|k| k.operation_label())
            .collect();
        assert_eq!(labels, vec!["insert_many", "replace_many", "delete_many_by_ids"]);
        assert_eq!(OperationKind::Update.to_string(), "update");
    }

    #[test]
    fn test_queues_keep_duplicates_in_order() {
        let mut queues = PendingQueues::new();
        queues.push_insertion("a");
        queues.push_insertion("b");
        queues.push_insertion("a");

        assert_eq!(queues.insertions(), &["a", "b", "a"]);
        assert_eq!(queues.len_of(OperationKind::Insert), 3);
        assert_eq!(queues.total(), 3);
    }

    #[test]
    fn test_clear_is_per_kind() {
        let mut queues = PendingQueues::new();
        queues.push_insertion(1);
        queues.push_update(2);
        queues.push_deletion(DocumentId::Int(3));

        queues.clear(OperationKind::Update);

        assert_eq!(queues.insertions(), &[1]);
        assert!(queues.updates().is_empty());
        assert_eq!(queues.deletions(), &[DocumentId::Int(3)]);
        assert!(!queues.is_empty());

        queues.clear(OperationKind::Insert);
        queues.clear(OperationKind::Delete);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&OperationKind::Delete).unwrap();
        assert_eq!(json, "\"delete\"");
    }
}
