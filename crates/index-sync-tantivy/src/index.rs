//! On-disk sync index shared by every entity type.
//!
//! Tantivy allows one writer per index directory, so [`SyncIndex`] opens
//! it once and every per-type client writes through the same handle.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use crate::client::TantivyIndexClient;
use crate::document::IndexableRecord;
use crate::error::TantivyClientError;
use crate::schema::{build_sync_schema, SyncSchema};

/// Default memory budget for IndexWriter (50MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Sync index configuration
#[derive(Debug, Clone)]
pub struct SyncIndexConfig {
    /// Path to index directory
    pub index_path: PathBuf,
    /// Memory budget for writer in MB
    pub writer_memory_mb: usize,
}

impl Default for SyncIndexConfig {
    fn default() -> Self {
        Self::new("./search-index")
    }
}

impl SyncIndexConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// An open index with its single writer.
pub struct SyncIndex {
    writer: Arc<Mutex<IndexWriter>>,
    reader: IndexReader,
    schema: SyncSchema,
}

impl SyncIndex {
    /// Open the index at the configured path, creating it if missing, and
    /// take its writer lock.
    pub fn open_or_create(config: SyncIndexConfig) -> Result<Self, TantivyClientError> {
        let index = open_or_create_index(&config.index_path)?;
        let schema = SyncSchema::from_schema(index.schema())?;

        let writer = index.writer(config.writer_memory_mb * 1024 * 1024)?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        info!(
            path = ?config.index_path,
            memory_mb = config.writer_memory_mb,
            "Opened sync index"
        );

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            reader,
            schema,
        })
    }

    /// Client for records of `object_type`, writing through the shared writer.
    pub fn client<R: IndexableRecord>(
        &self,
        object_type: impl Into<String>,
    ) -> TantivyIndexClient<R> {
        let object_type = object_type.into();
        debug!(object_type = %object_type, "Created index client");
        TantivyIndexClient::from_parts(
            self.writer.clone(),
            self.reader.clone(),
            self.schema.clone(),
            object_type,
        )
    }
}

fn open_or_create_index(path: &Path) -> Result<Index, TantivyClientError> {
    if path.join("meta.json").exists() {
        debug!(path = ?path, "Opening existing index");
        Ok(Index::open_in_dir(path)?)
    } else {
        info!(path = ?path, "Creating new index");
        std::fs::create_dir_all(path)?;
        let schema = build_sync_schema();
        Ok(Index::create_in_dir(path, schema.schema().clone())?)
    }
}
