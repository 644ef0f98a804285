//! Failure reporting for commit errors.
//!
//! A failed bulk call produces one error-level summary and one
//! critical-level record per affected item, so every entity that did
//! not reach the index can be traced afterwards. Reporting runs inside
//! the failure path and never fails itself.

use std::sync::{Arc, Mutex};

use tracing::error;

use crate::client::FieldAccessor;
use crate::identifier::DocumentId;

/// Marker used when a type name or identifier cannot be resolved.
pub const UNKNOWN: &str = "<unknown>";

/// Durable destination for diagnostics.
///
/// Implementations must not depend on the index write path.
pub trait DiagnosticSink: Send + Sync {
    fn log_error(&self, message: &str);
    fn log_critical(&self, message: &str);
}

/// Sink that emits diagnostics through `tracing`.
///
/// Critical records go to a dedicated target so subscribers can route
/// them to always-persisted storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log_error(&self, message: &str) {
        error!(target: "index_sync::diagnostics", "{}", message);
    }

    fn log_critical(&self, message: &str) {
        error!(target: "index_sync::critical", severity = "critical", "{}", message);
    }
}

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Critical,
}

/// A diagnostic kept by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    pub message: String,
}

/// Sink that keeps diagnostics in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, message: &str) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push(DiagnosticRecord {
            severity,
            message: message.to_string(),
        });
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Records of one severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<DiagnosticRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.severity == severity)
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn log_error(&self, message: &str) {
        self.push(Severity::Error, message);
    }

    fn log_critical(&self, message: &str) {
        self.push(Severity::Critical, message);
    }
}

/// An item of a failed batch.
///
/// Insert and update batches carry entity handles; delete batches
/// carry identifiers captured at event time.
#[derive(Debug)]
pub enum AffectedItem<'a, E> {
    Entity(&'a E),
    Identifier(&'a DocumentId),
}

/// Logs failed batches with per-item identity.
pub struct FailureReporter<E> {
    sink: Arc<dyn DiagnosticSink>,
    accessor: Arc<dyn FieldAccessor<E>>,
    identifier_field: String,
}

impl<E> FailureReporter<E> {
    pub fn new(
        sink: Arc<dyn DiagnosticSink>,
        accessor: Arc<dyn FieldAccessor<E>>,
        identifier_field: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            accessor,
            identifier_field: identifier_field.into(),
        }
    }

    /// Report a failed bulk operation.
    ///
    /// `type_name` is the client's object type when it exposes one.
    pub fn report<'a, I>(
        &self,
        operation: &str,
        error: &dyn std::error::Error,
        type_name: Option<&str>,
        items: I,
    ) where
        E: 'a,
        I: IntoIterator<Item = AffectedItem<'a, E>>,
    {
        self.sink
            .log_error(&format!("index sync {} failed: {}", operation, error));

        let type_name = type_name.filter(|t| !t.is_empty()).unwrap_or(UNKNOWN);
        for item in items {
            let id = self.resolve_identifier(&item);
            let id = id.as_deref().unwrap_or(UNKNOWN);
            self.sink.log_critical(&format!(
                "index sync {} failed for {} with identifier {}",
                operation, type_name, id
            ));
        }
    }

    fn resolve_identifier(&self, item: &AffectedItem<'_, E>) -> Option<String> {
        match item {
            AffectedItem::Entity(entity) => self
                .accessor
                .get_field(entity, &self.identifier_field)
                .as_ref()
                .and_then(DocumentId::from_value)
                .map(|id| id.to_string()),
            AffectedItem::Identifier(id) => Some(id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncError;
    use serde_json::{json, Value};

    fn reporter(sink: &RecordingSink) -> FailureReporter<Value> {
        FailureReporter::new(
            Arc::new(sink.clone()),
            Arc::new(crate::client::JsonFieldAccessor),
            "id",
        )
    }

    #[test]
    fn test_identifier_items() {
        let sink = RecordingSink::new();
        let ids = vec![DocumentId::from("42"), DocumentId::from("43")];
        let err = SyncError::Index("cluster red".into());

        reporter(&sink).report(
            "delete_many_by_ids",
            &err,
            Some("article"),
            ids.iter().map(AffectedItem::Identifier),
        );

        let errors = sink.with_severity(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("cluster red"));

        let critical = sink.with_severity(Severity::Critical);
        assert_eq!(critical.len(), 2);
        assert!(critical[0].message.contains("identifier 42"));
        assert!(critical[1].message.contains("identifier 43"));
        assert!(critical[0].message.contains("article"));
    }

    #[test]
    fn test_entity_items_resolve_through_accessor() {
        let sink = RecordingSink::new();
        let entities = vec![json!({"id": 7}), json!({"title": "no id"})];
        let err = SyncError::Unavailable("timeout".into());

        reporter(&sink).report(
            "insert_many",
            &err,
            None,
            entities.iter().map(AffectedItem::Entity),
        );

        let critical = sink.with_severity(Severity::Critical);
        assert_eq!(critical.len(), 2);
        assert_eq!(
            critical[0].message,
            "index sync insert_many failed for <unknown> with identifier 7"
        );
        assert!(critical[1].message.ends_with("identifier <unknown>"));
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let sink = TracingSink;
        sink.log_error("plain error");
        sink.log_critical("critical record");
    }
}
