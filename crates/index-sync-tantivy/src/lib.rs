//! # index-sync-tantivy
//!
//! Index write client for index-sync backed by an embedded Tantivy index.
//!
//! ## Features
//! - One on-disk index and writer shared by all entity types, with
//!   documents keyed by type and id
//! - Upsert semantics for insert and replace, so duplicate batch
//!   entries collapse onto one document
//! - One commit per bulk call, with rollback when staging fails

pub mod client;
pub mod document;
pub mod error;
pub mod index;
pub mod schema;

pub use client::TantivyIndexClient;
pub use document::{record_to_doc, IndexableRecord};
pub use error::TantivyClientError;
pub use index::{SyncIndex, SyncIndexConfig};
pub use schema::{build_sync_schema, type_key, SyncSchema};
