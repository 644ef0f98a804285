//! End-to-end test infrastructure for index-sync.
//!
//! Provides a shared TestHarness wiring a [`SyncEngine`] to a Tantivy
//! index through an [`InstrumentedClient`] that records every bulk call
//! and can be told to fail per operation kind.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use index_sync_core::{
    CommitTrigger, DiagnosticSink, DocumentId, IndexWriteClient, OperationKind, RecordingSink,
    SyncConfig, SyncEngine, SyncError,
};
use index_sync_tantivy::{IndexableRecord, SyncIndex, SyncIndexConfig, TantivyIndexClient};

/// Type name products are indexed under.
pub const PRODUCT_TYPE: &str = "product";

/// Entity type used across the scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub kind: &'static str,
    pub id: i64,
    pub name: String,
    pub published: bool,
}

impl Product {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            kind: PRODUCT_TYPE,
            id,
            name: name.to_string(),
            published: true,
        }
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }
}

impl IndexableRecord for Product {
    fn record_type(&self) -> &str {
        self.kind
    }

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn text(&self) -> String {
        self.name.clone()
    }
}

/// Field accessor for [`Product`].
pub fn product_field(product: &Product, field: &str) -> Option<Value> {
    match field {
        "id" => Some(json!(product.id)),
        "name" => Some(json!(product.name)),
        _ => None,
    }
}

/// Indexability policy: only published products are searchable.
pub fn published_products(_index: &str, _type_name: &str, product: &Product) -> bool {
    product.published
}

/// A bulk call seen by [`InstrumentedClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCall {
    pub kind: OperationKind,
    pub ids: Vec<String>,
}

/// Wraps an index client, recording calls and failing on demand.
pub struct InstrumentedClient<C> {
    inner: C,
    calls: Mutex<Vec<BulkCall>>,
    failing: Mutex<HashSet<OperationKind>>,
}

impl<C> InstrumentedClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn fail_on(&self, kind: OperationKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<BulkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: OperationKind) -> Vec<BulkCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect()
    }

    fn record(&self, kind: OperationKind, ids: Vec<String>) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(BulkCall { kind, ids });
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(SyncError::Unavailable(format!(
                "injected {} failure",
                kind.operation_label()
            )));
        }
        Ok(())
    }
}

impl<R, C> IndexWriteClient<R> for InstrumentedClient<C>
where
    R: IndexableRecord,
    C: IndexWriteClient<R>,
{
    fn handles_entity(&self, entity: &R) -> bool {
        self.inner.handles_entity(entity)
    }

    fn insert_many(&self, entities: &[R]) -> Result<(), SyncError> {
        let ids = entities.iter().map(|e| e.record_id()).collect();
        self.record(OperationKind::Insert, ids)?;
        self.inner.insert_many(entities)
    }

    fn replace_many(&self, entities: &[R]) -> Result<(), SyncError> {
        let ids = entities.iter().map(|e| e.record_id()).collect();
        self.record(OperationKind::Update, ids)?;
        self.inner.replace_many(entities)
    }

    fn delete_many_by_ids(&self, ids: &[DocumentId]) -> Result<(), SyncError> {
        let labels = ids.iter().map(|id| id.to_string()).collect();
        self.record(OperationKind::Delete, labels)?;
        self.inner.delete_many_by_ids(ids)
    }

    fn object_type_name(&self) -> Option<String> {
        self.inner.object_type_name()
    }
}

pub type ProductClient = InstrumentedClient<TantivyIndexClient<Product>>;

/// Bind a loaded sync config to the product type.
pub fn product_sync_config(mut config: SyncConfig) -> SyncConfig {
    config.type_name = PRODUCT_TYPE.to_string();
    config
}

/// Synthetic event stream replayed by `sync-driver`.
#[derive(Debug, Clone)]
pub struct ReplayPlan {
    /// Number of products to create
    pub products: i64,
    /// Events between commit triggers
    pub batch: i64,
    /// Fail deletes on every Nth trigger (0 disables)
    pub fail_every: usize,
}

/// Replay `plan` into `engine`, firing both triggers every batch.
///
/// Every third product is unpublished right after creation, every fifth
/// other one is removed. Injected failures are lifted before a final
/// commit, so nothing stays pending once the replay returns unless the
/// index itself fails.
pub fn replay(engine: &mut SyncEngine<Product>, client: &ProductClient, plan: &ReplayPlan) {
    let batch = plan.batch.max(1);
    let mut triggers = 0usize;

    for id in 1..=plan.products {
        let product = Product::new(id, &format!("Product {}", id));

        engine.on_create(product.clone());
        if id % 3 == 0 {
            engine.on_update(product.clone().unpublished());
        } else if id % 5 == 0 {
            engine.on_before_remove(&product);
        }

        if id % batch == 0 {
            triggers += 1;
            if plan.fail_every > 0 && triggers % plan.fail_every == 0 {
                client.fail_on(OperationKind::Delete);
            } else {
                client.recover();
            }
            engine.pre_commit();
            engine.post_commit();
        }
    }

    // Flush the trailing partial batch whichever trigger is configured
    client.recover();
    engine.commit();
}

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    pub client: Arc<ProductClient>,
    pub sink: RecordingSink,
    pub engine: SyncEngine<Product>,
}

impl TestHarness {
    /// Harness flushing on the post-commit trigger.
    pub fn new() -> Self {
        Self::with_trigger(CommitTrigger::PostCommit)
    }

    pub fn with_trigger(trigger: CommitTrigger) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let index = SyncIndex::open_or_create(SyncIndexConfig::new(temp_dir.path()))
            .expect("Failed to open test index");
        let client = Arc::new(InstrumentedClient::new(index.client::<Product>(PRODUCT_TYPE)));
        let sink = RecordingSink::new();

        let config = SyncConfig::new("catalog", PRODUCT_TYPE).with_trigger(trigger);
        let engine = SyncEngine::<Product>::with_sink(
            config,
            client.clone(),
            Arc::new(published_products),
            Arc::new(product_field),
            Arc::new(sink.clone()) as Arc<dyn DiagnosticSink>,
        )
        .expect("Failed to create engine");

        Self {
            _temp_dir: temp_dir,
            client,
            sink,
            engine,
        }
    }

    /// Whether the index currently holds a document for `id`.
    pub fn indexed(&self, id: i64) -> bool {
        self.client
            .inner()
            .contains(&id.to_string())
            .expect("Failed to query index")
    }

    pub fn document_count(&self) -> u64 {
        self.client
            .inner()
            .document_count()
            .expect("Failed to count documents")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
