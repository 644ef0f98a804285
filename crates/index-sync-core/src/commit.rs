//! Commit protocol for pending queues.
//!
//! Each kind is an isolated unit of work: its bulk call either succeeds
//! and the queue is cleared, or fails and the queue is left untouched
//! for the next trigger. A failure never stops the remaining kinds.

use tracing::{debug, info, warn};

use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::queue::OperationKind;
use crate::reporter::AffectedItem;

/// Result of one kind's bulk call.
#[derive(Debug)]
pub enum KindOutcome {
    /// Bulk call succeeded and the queue was cleared
    Committed { count: usize },
    /// Bulk call failed; the queue still holds `count` items
    Failed { count: usize, error: SyncError },
}

impl KindOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, KindOutcome::Committed { .. })
    }
}

/// Outcome of a commit, one entry per kind that had pending items.
#[derive(Debug, Default)]
pub struct CommitReport {
    pub outcomes: Vec<(OperationKind, KindOutcome)>,
}

impl CommitReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was pending.
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcome(&self, kind: OperationKind) -> Option<&KindOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    /// Items committed across all kinds.
    pub fn committed_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                KindOutcome::Committed { count } => *count,
                KindOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| !outcome.is_committed())
    }
}

impl<E> SyncEngine<E> {
    /// Flush pending queues to the index in order insert, update, delete.
    ///
    /// Failures are reported and absorbed; they are visible only in the
    /// returned report, the diagnostic sink and the queues that did not
    /// shrink.
    pub fn commit(&mut self) -> CommitReport {
        let mut report = CommitReport::new();

        if self.queues.is_empty() {
            debug!(index = %self.config.index_name, "Nothing pending to commit");
            return report;
        }

        for kind in OperationKind::COMMIT_ORDER {
            let count = self.queues.len_of(kind);
            if count == 0 {
                continue;
            }

            match self.run_bulk(kind) {
                Ok(()) => {
                    self.queues.clear(kind);
                    self.health.get_mut(kind).record_success(count);
                    info!(
                        index = %self.config.index_name,
                        kind = %kind,
                        count,
                        "Committed pending operations"
                    );
                    report.outcomes.push((kind, KindOutcome::Committed { count }));
                }
                Err(error) => {
                    let health = self.health.get_mut(kind);
                    health.record_failure();
                    warn!(
                        index = %self.config.index_name,
                        kind = %kind,
                        count,
                        consecutive_failures = health.consecutive_failures,
                        error = %error,
                        "Commit failed, keeping operations for retry"
                    );
                    self.report_failure(kind, &error);
                    report.outcomes.push((kind, KindOutcome::Failed { count, error }));
                }
            }
        }

        report
    }

    fn run_bulk(&self, kind: OperationKind) -> Result<(), SyncError> {
        match kind {
            OperationKind::Insert => self.client.insert_many(self.queues.insertions()),
            OperationKind::Update => self.client.replace_many(self.queues.updates()),
            OperationKind::Delete => self.client.delete_many_by_ids(self.queues.deletions()),
        }
    }

    fn report_failure(&self, kind: OperationKind, error: &SyncError) {
        let type_name = self.client.object_type_name();
        let label = kind.operation_label();
        let type_name = type_name.as_deref();

        match kind {
            OperationKind::Insert => self.reporter.report(
                label,
                error,
                type_name,
                self.queues.insertions().iter().map(AffectedItem::Entity),
            ),
            OperationKind::Update => self.reporter.report(
                label,
                error,
                type_name,
                self.queues.updates().iter().map(AffectedItem::Entity),
            ),
            OperationKind::Delete => self.reporter.report(
                label,
                error,
                type_name,
                self.queues.deletions().iter().map(AffectedItem::Identifier),
            ),
        }
    }
}
