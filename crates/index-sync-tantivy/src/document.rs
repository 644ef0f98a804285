//! Mapping from synchronized entities to Tantivy documents.

use tantivy::doc;
use tantivy::TantivyDocument;

use crate::schema::{type_key, SyncSchema};

/// An entity that can be written to the sync index.
pub trait IndexableRecord: Send + Sync {
    /// Entity type name, matched against the client's object type
    fn record_type(&self) -> &str;

    /// Primary key of the document
    fn record_id(&self) -> String;

    /// Searchable text
    fn text(&self) -> String;

    fn keywords(&self) -> Vec<String> {
        Vec::new()
    }

    /// Last modification time in milliseconds since epoch
    fn updated_ms(&self) -> i64 {
        0
    }
}

impl<T: IndexableRecord + ?Sized> IndexableRecord for std::sync::Arc<T> {
    fn record_type(&self) -> &str {
        (**self).record_type()
    }

    fn record_id(&self) -> String {
        (**self).record_id()
    }

    fn text(&self) -> String {
        (**self).text()
    }

    fn keywords(&self) -> Vec<String> {
        (**self).keywords()
    }

    fn updated_ms(&self) -> i64 {
        (**self).updated_ms()
    }
}

/// Convert a record to a Tantivy document.
pub fn record_to_doc<R: IndexableRecord + ?Sized>(
    schema: &SyncSchema,
    record: &R,
) -> TantivyDocument {
    let doc_id = record.record_id();
    doc!(
        schema.type_key => type_key(record.record_type(), &doc_id),
        schema.doc_type => record.record_type().to_string(),
        schema.doc_id => doc_id,
        schema.text => record.text(),
        schema.keywords => record.keywords().join(" "),
        schema.updated_ms => record.updated_ms().to_string()
    )
}
