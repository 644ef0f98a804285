//! Lifecycle event routing.
//!
//! Filters events by client ownership and indexability and appends the
//! entity (or its identifier) to the matching pending queue. Routing has
//! no error path: an unreadable identifier means nothing to delete.

use tracing::{debug, trace};

use crate::engine::SyncEngine;
use crate::identifier::DocumentId;

impl<E> SyncEngine<E> {
    /// Entity was created in the store.
    pub fn on_create(&mut self, entity: E) {
        if !self.client.handles_entity(&entity) {
            return;
        }
        if self.is_indexable(&entity) {
            self.queues.push_insertion(entity);
            trace!(pending = self.queues.insertions().len(), "Queued insertion");
        }
    }

    /// Entity was modified in the store.
    ///
    /// An entity that is no longer indexable is queued for deletion
    /// instead of replacement.
    pub fn on_update(&mut self, entity: E) {
        if !self.client.handles_entity(&entity) {
            return;
        }
        if self.is_indexable(&entity) {
            self.queues.push_update(entity);
            trace!(pending = self.queues.updates().len(), "Queued update");
        } else {
            debug!(
                index = %self.config.index_name,
                "Entity no longer indexable, queueing deletion"
            );
            self.capture_deletion(&entity);
        }
    }

    /// Entity is about to be removed from the store.
    ///
    /// Must run while the entity is still readable. Indexability is not
    /// consulted: a removed entity is deleted from the index regardless.
    pub fn on_before_remove(&mut self, entity: &E) {
        if self.client.handles_entity(entity) {
            self.capture_deletion(entity);
        }
    }

    fn is_indexable(&self, entity: &E) -> bool {
        self.policy
            .is_indexable(&self.config.index_name, &self.config.type_name, entity)
    }

    fn capture_deletion(&mut self, entity: &E) {
        let id = self
            .accessor
            .get_field(entity, &self.config.identifier)
            .as_ref()
            .and_then(DocumentId::from_value);

        match id {
            Some(id) => {
                trace!(id = %id, "Queued deletion");
                self.queues.push_deletion(id);
            }
            None => {
                debug!(
                    field = %self.config.identifier,
                    "No identifier value, nothing to delete"
                );
            }
        }
    }
}
