// Copyright 2025 Cowboy AI, LLC.

//! Workspace configuration

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::StorageError;
use crate::repository::DEFAULT_IDENTITY_PREFIX;
use crate::store::{GraphPersistence, JsonFilePersistence, MemoryPersistence};

/// Default number of cached views
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Where committed state is flushed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Keep everything in process memory
    #[default]
    Memory,
    /// One JSON document on disk
    JsonFile {
        /// Document path
        path: PathBuf,
    },
}

impl StorageConfig {
    /// Instantiate the configured backend
    pub fn open(&self) -> Box<dyn GraphPersistence> {
        match self {
            StorageConfig::Memory => Box::new(MemoryPersistence),
            StorageConfig::JsonFile { path } => Box::new(JsonFilePersistence::new(path.clone())),
        }
    }
}

/// Configuration for a [`CategoryWorkspace`](crate::CategoryWorkspace)
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```
/// use codices::WorkspaceConfig;
///
/// let config = WorkspaceConfig::from_json_str(r#"{"cache_capacity": 8}"#).unwrap();
/// assert_eq!(config.cache_capacity.get(), 8);
/// assert_eq!(config.identity_prefix, "id_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Maximum number of cached views
    pub cache_capacity: NonZeroUsize,
    /// Prefix of identity morphism names
    pub identity_prefix: String,
    /// Persistence backend
    pub storage: StorageConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            identity_prefix: DEFAULT_IDENTITY_PREFIX.to_string(),
            storage: StorageConfig::Memory,
        }
    }
}

impl WorkspaceConfig {
    /// In-memory workspace with defaults
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Defaults, persisted to a JSON document at `path`
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig::JsonFile { path: path.into() },
            ..Self::default()
        }
    }

    /// Parse a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Set the cache capacity
    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the identity morphism name prefix
    pub fn with_identity_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identity_prefix = prefix.into();
        self
    }
}
