//! Tantivy schema for synchronized documents.
//!
//! Every entity type shares one schema. `doc_id` is only unique within a
//! type, so replace and delete go through `type_key`, which joins both.

use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};

use crate::error::TantivyClientError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct SyncSchema {
    schema: Schema,
    /// Entity type name (STRING | STORED)
    pub doc_type: Field,
    /// Entity identifier, unique per type (STRING | STORED)
    pub doc_id: Field,
    /// Primary key `{doc_type}:{doc_id}` (STRING)
    pub type_key: Field,
    /// Searchable text (TEXT)
    pub text: Field,
    /// Keywords/tags (TEXT | STORED)
    pub keywords: Field,
    /// Last modification in milliseconds (STRING | STORED)
    pub updated_ms: Field,
}

impl SyncSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a SyncSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, TantivyClientError> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| TantivyClientError::SchemaMismatch(format!("missing {} field", name)))
        };

        let doc_type = field("doc_type")?;
        let doc_id = field("doc_id")?;
        let type_key = field("type_key")?;
        let text = field("text")?;
        let keywords = field("keywords")?;
        let updated_ms = field("updated_ms")?;

        Ok(Self {
            schema,
            doc_type,
            doc_id,
            type_key,
            text,
            keywords,
            updated_ms,
        })
    }
}

/// Primary key of a document of `doc_type` with id `doc_id`.
pub fn type_key(doc_type: &str, doc_id: &str) -> String {
    format!("{}:{}", doc_type, doc_id)
}

/// Build the document schema.
pub fn build_sync_schema() -> SyncSchema {
    let mut schema_builder = Schema::builder();

    let doc_type = schema_builder.add_text_field("doc_type", STRING | STORED);
    let doc_id = schema_builder.add_text_field("doc_id", STRING | STORED);
    let type_key = schema_builder.add_text_field("type_key", STRING);
    let text = schema_builder.add_text_field("text", TEXT);
    let keywords = schema_builder.add_text_field("keywords", TEXT | STORED);
    let updated_ms = schema_builder.add_text_field("updated_ms", STRING | STORED);

    let schema = schema_builder.build();

    SyncSchema {
        schema,
        doc_type,
        doc_id,
        type_key,
        text,
        keywords,
        updated_ms,
    }
}
