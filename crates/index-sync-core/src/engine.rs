//! Sync engine owning the pending queues of one entity/index binding.
//!
//! Event hooks live in the router module, the commit protocol in
//! [`crate::commit`]. The engine is `&mut self` throughout: events and
//! triggers are expected from a single caller. Hosts that deliver
//! events concurrently wrap it in [`SharedSyncEngine`].

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::client::{FieldAccessor, IndexWriteClient, IndexabilityPolicy};
use crate::commit::CommitReport;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::health::SyncHealth;
use crate::queue::PendingQueues;
use crate::reporter::{DiagnosticSink, FailureReporter, TracingSink};

/// Keeps a search index in step with store lifecycle events.
pub struct SyncEngine<E> {
    pub(crate) config: SyncConfig,
    pub(crate) client: Arc<dyn IndexWriteClient<E>>,
    pub(crate) policy: Arc<dyn IndexabilityPolicy<E>>,
    pub(crate) accessor: Arc<dyn FieldAccessor<E>>,
    pub(crate) reporter: FailureReporter<E>,
    pub(crate) queues: PendingQueues<E>,
    pub(crate) health: SyncHealth,
}

impl<E> SyncEngine<E> {
    /// Create an engine with empty queues, reporting through `tracing`.
    pub fn new(
        config: SyncConfig,
        client: Arc<dyn IndexWriteClient<E>>,
        policy: Arc<dyn IndexabilityPolicy<E>>,
        accessor: Arc<dyn FieldAccessor<E>>,
    ) -> Result<Self, SyncError> {
        Self::with_sink(config, client, policy, accessor, Arc::new(TracingSink))
    }

    /// Create an engine with an explicit diagnostic sink.
    pub fn with_sink(
        config: SyncConfig,
        client: Arc<dyn IndexWriteClient<E>>,
        policy: Arc<dyn IndexabilityPolicy<E>>,
        accessor: Arc<dyn FieldAccessor<E>>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, SyncError> {
        config.validate()?;
        let reporter = FailureReporter::new(sink, accessor.clone(), config.identifier.clone());

        info!(
            index = %config.index_name,
            type_name = %config.type_name,
            trigger = ?config.trigger,
            "Created sync engine"
        );

        Ok(Self {
            config,
            client,
            policy,
            accessor,
            reporter,
            queues: PendingQueues::new(),
            health: SyncHealth::default(),
        })
    }

    /// Commit trigger fired before the store transaction is finalized.
    ///
    /// Flushes only when the configured trigger allows it.
    pub fn pre_commit(&mut self) {
        if self.config.trigger.flushes_on_pre_commit() {
            self.commit();
        } else {
            debug!(index = %self.config.index_name, "Pre-commit trigger ignored");
        }
    }

    /// Commit trigger fired after the store transaction is finalized.
    pub fn post_commit(&mut self) {
        if self.config.trigger.flushes_on_post_commit() {
            self.commit();
        } else {
            debug!(index = %self.config.index_name, "Post-commit trigger ignored");
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Operations waiting for the next commit.
    pub fn pending(&self) -> &PendingQueues<E> {
        &self.queues
    }

    pub fn health(&self) -> &SyncHealth {
        &self.health
    }
}

/// Cloneable, lock-guarded handle to a [`SyncEngine`].
///
/// Appends and drain-and-clear each run inside one lock section, so
/// concurrent event delivery cannot interleave with a commit.
pub struct SharedSyncEngine<E> {
    inner: Arc<Mutex<SyncEngine<E>>>,
}

impl<E> Clone for SharedSyncEngine<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> SharedSyncEngine<E> {
    pub fn new(engine: SyncEngine<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    // Hooks never fail, so a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, SyncEngine<E>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn on_create(&self, entity: E) {
        self.lock().on_create(entity);
    }

    pub fn on_update(&self, entity: E) {
        self.lock().on_update(entity);
    }

    pub fn on_before_remove(&self, entity: &E) {
        self.lock().on_before_remove(entity);
    }

    pub fn pre_commit(&self) {
        self.lock().pre_commit();
    }

    pub fn post_commit(&self) {
        self.lock().post_commit();
    }

    pub fn commit(&self) -> CommitReport {
        self.lock().commit()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut SyncEngine<E>) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AlwaysIndexable;
    use crate::config::CommitTrigger;
    use crate::testing::{article, article_accessor, Article, MockClient};

    fn engine(trigger: CommitTrigger, client: Arc<MockClient>) -> SyncEngine<Article> {
        let config = SyncConfig::new("catalog", "article").with_trigger(trigger);
        SyncEngine::<Article>::new(
            config,
            client,
            Arc::new(AlwaysIndexable),
            Arc::new(article_accessor),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SyncConfig::new("", "article");
        let result = SyncEngine::<Article>::new(
            config,
            Arc::new(MockClient::new()),
            Arc::new(AlwaysIndexable),
            Arc::new(article_accessor),
        );
        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn test_post_commit_flushes_by_default() {
        let client = Arc::new(MockClient::new());
        let mut engine = engine(CommitTrigger::PostCommit, client.clone());
        engine.on_create(article("1", true));

        engine.pre_commit();
        assert_eq!(client.calls().len(), 0);
        assert_eq!(engine.pending().insertions().len(), 1);

        engine.post_commit();
        assert_eq!(client.calls().len(), 1);
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn test_pre_commit_trigger() {
        let client = Arc::new(MockClient::new());
        let mut engine = engine(CommitTrigger::PreCommit, client.clone());
        engine.on_create(article("1", true));

        engine.post_commit();
        assert_eq!(client.calls().len(), 0);

        engine.pre_commit();
        assert_eq!(client.calls().len(), 1);
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn test_both_triggers() {
        let client = Arc::new(MockClient::new());
        let mut engine = engine(CommitTrigger::Both, client.clone());
        engine.on_create(article("1", true));

        engine.pre_commit();
        engine.post_commit();
        // Second trigger finds nothing pending
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn test_shared_engine_across_threads() {
        let client = Arc::new(MockClient::new());
        let shared = SharedSyncEngine::new(engine(CommitTrigger::PostCommit, client.clone()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        shared.on_create(article(&format!("{}-{}", t, i), true));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.with_engine(|e| e.pending().insertions().len()), 100);
        shared.post_commit();
        assert!(shared.with_engine(|e| e.pending().is_empty()));
        assert_eq!(client.inserted().len(), 100);
    }
}
