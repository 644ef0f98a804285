//! Index write client backed by Tantivy.
//!
//! Each bulk call is one unit: documents are staged on the shared
//! IndexWriter and committed together. If staging fails the writer is
//! rolled back so a retried batch starts from a clean slate.
//!
//! Several clients may share one writer. Every term a client deletes or
//! queries is scoped to its object type, so ids only need to be unique
//! within a type.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use tantivy::collector::Count;
use tantivy::query::TermQuery;
use tantivy::schema::IndexRecordOption;
use tantivy::{IndexReader, IndexWriter, Term};
use tracing::{debug, info, warn};

use index_sync_core::{DocumentId, IndexWriteClient, SyncError};

use crate::document::{record_to_doc, IndexableRecord};
use crate::error::TantivyClientError;
use crate::schema::{type_key, SyncSchema};

/// Writes records of one entity type to a Tantivy index.
pub struct TantivyIndexClient<R> {
    writer: Arc<Mutex<IndexWriter>>,
    reader: IndexReader,
    schema: SyncSchema,
    object_type: String,
    _record: PhantomData<fn(&R)>,
}

impl<R: IndexableRecord> TantivyIndexClient<R> {
    /// Build a client over a writer shared through [`SyncIndex::client`].
    ///
    /// [`SyncIndex::client`]: crate::index::SyncIndex::client
    pub(crate) fn from_parts(
        writer: Arc<Mutex<IndexWriter>>,
        reader: IndexReader,
        schema: SyncSchema,
        object_type: String,
    ) -> Self {
        Self {
            writer,
            reader,
            schema,
            object_type,
            _record: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexWriter>, TantivyClientError> {
        self.writer
            .lock()
            .map_err(|e| TantivyClientError::IndexLocked(e.to_string()))
    }

    fn key_term(&self, doc_type: &str, id: &str) -> Term {
        Term::from_field_text(self.schema.type_key, &type_key(doc_type, id))
    }

    /// Replace-or-add every record, then commit.
    fn upsert(&self, records: &[R]) -> Result<u64, TantivyClientError> {
        let mut writer = self.lock()?;

        let staged: Result<(), TantivyClientError> = records.iter().try_for_each(|record| {
            writer.delete_term(self.key_term(record.record_type(), &record.record_id()));
            writer.add_document(record_to_doc(&self.schema, record))?;
            Ok(())
        });

        if let Err(e) = staged {
            warn!(error = %e, "Staging failed, rolling back");
            writer.rollback()?;
            return Err(e);
        }

        let opstamp = writer.commit()?;
        debug!(count = records.len(), opstamp, "Committed upsert batch");
        Ok(opstamp)
    }

    fn delete(&self, ids: &[DocumentId]) -> Result<u64, TantivyClientError> {
        let mut writer = self.lock()?;
        for id in ids {
            writer.delete_term(self.key_term(&self.object_type, &id.as_term()));
        }
        let opstamp = writer.commit()?;
        debug!(count = ids.len(), opstamp, "Committed delete batch");
        Ok(opstamp)
    }

    fn count(&self, term: Term) -> Result<usize, TantivyClientError> {
        self.reader.reload()?;
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        Ok(self.reader.searcher().search(&query, &Count)?)
    }

    /// Number of live documents of this client's type as of the last commit.
    pub fn document_count(&self) -> Result<u64, TantivyClientError> {
        let term = Term::from_field_text(self.schema.doc_type, &self.object_type);
        Ok(self.count(term)? as u64)
    }

    /// Whether a document of this client's type with this id is live.
    pub fn contains(&self, id: &str) -> Result<bool, TantivyClientError> {
        Ok(self.count(self.key_term(&self.object_type, id))? > 0)
    }
}

impl<R: IndexableRecord> IndexWriteClient<R> for TantivyIndexClient<R> {
    fn handles_entity(&self, entity: &R) -> bool {
        entity.record_type() == self.object_type
    }

    fn insert_many(&self, entities: &[R]) -> Result<(), SyncError> {
        self.upsert(entities)?;
        info!(object_type = %self.object_type, count = entities.len(), "Inserted documents");
        Ok(())
    }

    fn replace_many(&self, entities: &[R]) -> Result<(), SyncError> {
        self.upsert(entities)?;
        info!(object_type = %self.object_type, count = entities.len(), "Replaced documents");
        Ok(())
    }

    fn delete_many_by_ids(&self, ids: &[DocumentId]) -> Result<(), SyncError> {
        self.delete(ids)?;
        info!(object_type = %self.object_type, count = ids.len(), "Deleted documents");
        Ok(())
    }

    fn object_type_name(&self) -> Option<String> {
        Some(self.object_type.clone())
    }
}
