//! Configuration for index synchronization.
//!
//! Layered config: defaults -> config file -> explicit file -> env vars.
//! The default config file lives at ~/.config/index-sync/config.{toml,yaml,json}.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SyncError;

/// Which commit trigger flushes pending queues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommitTrigger {
    /// Flush after the store transaction is finalized (recommended)
    #[default]
    PostCommit,
    /// Flush before the store transaction is finalized. The index can
    /// diverge from the store if the transaction then fails.
    PreCommit,
    /// Flush at both points
    Both,
}

impl CommitTrigger {
    pub fn flushes_on_pre_commit(&self) -> bool {
        matches!(self, CommitTrigger::PreCommit | CommitTrigger::Both)
    }

    pub fn flushes_on_post_commit(&self) -> bool {
        matches!(self, CommitTrigger::PostCommit | CommitTrigger::Both)
    }
}

/// Binding of one entity type to one index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Entity field holding the document identifier
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Target index name, passed to the indexability policy
    pub index_name: String,

    /// Document type name within the index
    pub type_name: String,

    /// Commit trigger that flushes pending operations
    #[serde(default)]
    pub trigger: CommitTrigger,
}

fn default_identifier() -> String {
    "id".to_string()
}

impl SyncConfig {
    pub fn new(index_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            identifier: default_identifier(),
            index_name: index_name.into(),
            type_name: type_name.into(),
            trigger: CommitTrigger::default(),
        }
    }

    pub fn with_identifier(mut self, field: impl Into<String>) -> Self {
        self.identifier = field.into();
        self
    }

    pub fn with_trigger(mut self, trigger: CommitTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.identifier.trim().is_empty() {
            return Err(SyncError::Config("identifier must not be empty".into()));
        }
        if self.index_name.trim().is_empty() {
            return Err(SyncError::Config("index_name must not be empty".into()));
        }
        if self.type_name.trim().is_empty() {
            return Err(SyncError::Config("type_name must not be empty".into()));
        }
        Ok(())
    }
}

/// Process-level settings for hosts embedding the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Entity/index binding
    pub sync: SyncConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path to the on-disk search index
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_index_path() -> String {
    ProjectDirs::from("", "", "index-sync")
        .map(|p| p.data_local_dir().join("search-index"))
        .unwrap_or_else(|| PathBuf::from("./search-index"))
        .to_string_lossy()
        .to_string()
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/index-sync/config.*)
    /// 3. Explicit config file (optional, must exist when given)
    /// 4. Environment variables (INDEX_SYNC_*, nested keys joined by `__`)
    pub fn load(config_path: Option<&str>) -> Result<Self, SyncError> {
        let config_dir = ProjectDirs::from("", "", "index-sync")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("sync.identifier", default_identifier())?
            .set_default("sync.index_name", "default")?
            .set_default("sync.type_name", "document")?
            .set_default("sync.trigger", "post_commit")?
            .set_default("log_level", default_log_level())?
            .set_default("index_path", default_index_path())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: INDEX_SYNC_LOG_LEVEL, INDEX_SYNC_SYNC__INDEX_NAME, etc.
        builder = builder.add_source(
            Environment::with_prefix("INDEX_SYNC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.sync.validate()?;
        Ok(settings)
    }

    /// Index path with a leading `~/` expanded.
    pub fn expanded_index_path(&self) -> PathBuf {
        if let Some(rest) = self.index_path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new() {
                return home.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.index_path)
    }
}
