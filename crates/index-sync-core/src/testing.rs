//! Shared fixtures for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::client::IndexWriteClient;
use crate::error::SyncError;
use crate::identifier::DocumentId;
use crate::queue::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: Option<String>,
    pub kind: &'static str,
    pub published: bool,
}

pub fn article(id: &str, published: bool) -> Article {
    Article {
        id: Some(id.to_string()),
        kind: "article",
        published,
    }
}

/// An entity of a type the mock client does not handle.
pub fn foreign(id: &str) -> Article {
    Article {
        id: Some(id.to_string()),
        kind: "user",
        published: true,
    }
}

pub fn article_accessor(entity: &Article, field: &str) -> Option<Value> {
    match field {
        "id" => entity.id.as_ref().map(|id| json!(id)),
        "slug" => entity.id.as_ref().map(|id| json!(format!("slug-{}", id))),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Insert(Vec<String>),
    Replace(Vec<String>),
    Delete(Vec<DocumentId>),
}

/// Index client that records bulk calls and fails on demand.
#[derive(Default)]
pub struct MockClient {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<OperationKind>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, kind: OperationKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids of every inserted entity, across calls.
    pub fn inserted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn record(&self, kind: OperationKind, call: Call) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&kind) {
            Err(SyncError::Index(format!("mock {} failure", kind)))
        } else {
            Ok(())
        }
    }
}

fn ids(entities: &[Article]) -> Vec<String> {
    entities
        .iter()
        .map(|a| a.id.clone().unwrap_or_default())
        .collect()
}

impl IndexWriteClient<Article> for MockClient {
    fn handles_entity(&self, entity: &Article) -> bool {
        entity.kind == "article"
    }

    fn insert_many(&self, entities: &[Article]) -> Result<(), SyncError> {
        self.record(OperationKind::Insert, Call::Insert(ids(entities)))
    }

    fn replace_many(&self, entities: &[Article]) -> Result<(), SyncError> {
        self.record(OperationKind::Update, Call::Replace(ids(entities)))
    }

    fn delete_many_by_ids(&self, ids: &[DocumentId]) -> Result<(), SyncError> {
        self.record(OperationKind::Delete, Call::Delete(ids.to_vec()))
    }

    fn object_type_name(&self) -> Option<String> {
        Some("article".to_string())
    }
}
