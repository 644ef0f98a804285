//! Collaborator interfaces consumed by the sync engine.
//!
//! The engine owns none of these concerns: ownership checks and bulk
//! writes belong to the index client, the indexing decision to the
//! policy, and field reads to the accessor.

use serde_json::Value;

use crate::error::SyncError;
use crate::identifier::DocumentId;

/// Bulk index writes for one entity type.
///
/// Each call is a single round-trip carrying the whole batch. An error
/// means the batch as a whole must be retried.
pub trait IndexWriteClient<E>: Send + Sync {
    /// Whether this client indexes entities of `entity`'s type.
    fn handles_entity(&self, entity: &E) -> bool;

    /// Add newly indexable entities.
    fn insert_many(&self, entities: &[E]) -> Result<(), SyncError>;

    /// Replace the indexed documents of the given entities.
    fn replace_many(&self, entities: &[E]) -> Result<(), SyncError>;

    /// Remove documents by identifier.
    fn delete_many_by_ids(&self, ids: &[DocumentId]) -> Result<(), SyncError>;

    /// Name of the configured object type, used for diagnostics only.
    fn object_type_name(&self) -> Option<String> {
        None
    }
}

/// Decides whether an entity currently belongs in an index.
pub trait IndexabilityPolicy<E>: Send + Sync {
    fn is_indexable(&self, index_name: &str, type_name: &str, entity: &E) -> bool;
}

impl<E, F> IndexabilityPolicy<E> for F
where
    F: Fn(&str, &str, &E) -> bool + Send + Sync,
{
    fn is_indexable(&self, index_name: &str, type_name: &str, entity: &E) -> bool {
        self(index_name, type_name, entity)
    }
}

/// Policy that indexes every owned entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysIndexable;

impl<E> IndexabilityPolicy<E> for AlwaysIndexable {
    fn is_indexable(&self, _index_name: &str, _type_name: &str, _entity: &E) -> bool {
        true
    }
}

/// Reads a named field from an entity.
///
/// Returns `None` when the field is absent or unreadable; the engine
/// treats that the same as an empty identifier.
pub trait FieldAccessor<E>: Send + Sync {
    fn get_field(&self, entity: &E, field: &str) -> Option<Value>;
}

impl<E, F> FieldAccessor<E> for F
where
    F: Fn(&E, &str) -> Option<Value> + Send + Sync,
{
    fn get_field(&self, entity: &E, field: &str) -> Option<Value> {
        self(entity, field)
    }
}

/// Accessor for entities that are already JSON objects.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFieldAccessor;

impl FieldAccessor<Value> for JsonFieldAccessor {
    fn get_field(&self, entity: &Value, field: &str) -> Option<Value> {
        entity.get(field).cloned()
    }
}
