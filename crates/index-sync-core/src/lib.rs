//! Search index synchronization for store lifecycle events.
//!
//! This crate batches entity lifecycle events from an authoritative store
//! and commits them to a search index at a well-defined trigger point.
//!
//! ## Key Components
//!
//! - [`SyncEngine`]: Owns the pending queues of one entity/index binding
//! - [`PendingQueues`]: Insertions, updates and deletion identifiers
//! - [`IndexWriteClient`]: Bulk insert/replace/delete against the index
//! - [`IndexabilityPolicy`]: Decides whether an entity belongs in the index
//! - [`FieldAccessor`]: Reads the identifier field of an entity
//! - [`FailureReporter`]: Logs failed batches with per-item identity
//! - [`SharedSyncEngine`]: Lock-guarded handle for concurrent hosts
//!
//! ## Architecture
//!
//! 1. The store raises create/update/before-remove events
//! 2. Events for owned entity types are routed into pending queues;
//!    entities that lose indexability are queued for deletion
//! 3. At the commit trigger each queue is flushed by one bulk call
//! 4. A queue is cleared only when its bulk call succeeds; failures are
//!    logged and the queue is retried at the next trigger
//!
//! ## Example
//!
//! ```ignore
//! use index_sync_core::{AlwaysIndexable, SyncConfig, SyncEngine};
//!
//! let mut engine = SyncEngine::new(
//!     SyncConfig::new("catalog", "product"),
//!     client,
//!     Arc::new(AlwaysIndexable),
//!     accessor,
//! )?;
//!
//! engine.on_create(product);
//! // ... store transaction finalized
//! engine.post_commit();
//! ```

pub mod client;
pub mod commit;
pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod identifier;
pub mod queue;
pub mod reporter;
mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    AlwaysIndexable, FieldAccessor, IndexWriteClient, IndexabilityPolicy, JsonFieldAccessor,
};
pub use commit::{CommitReport, KindOutcome};
pub use config::{CommitTrigger, Settings, SyncConfig};
pub use engine::{SharedSyncEngine, SyncEngine};
pub use error::SyncError;
pub use health::{KindHealth, SyncHealth};
pub use identifier::DocumentId;
pub use queue::{OperationKind, PendingQueues};
pub use reporter::{
    AffectedItem, DiagnosticRecord, DiagnosticSink, FailureReporter, RecordingSink, Severity,
    TracingSink,
};
