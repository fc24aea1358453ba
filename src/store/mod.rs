//! Artifact retrieval.
//!
//! Result entries name artifacts; an [`ArtifactStore`] turns an entry into
//! the artifact's bytes. The backend returns filesystem paths, so
//! [`FsArtifactStore`] is the store used in practice.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::models::ResultEntry;

/// Errors that can occur when retrieving an artifact
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No artifact exists for the entry
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// The artifact exists but could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// A byte-addressable source of artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync + std::fmt::Debug {
    /// Fetch the raw bytes for `entry`.
    async fn fetch(&self, entry: &ResultEntry) -> Result<Vec<u8>, StoreError>;
}

/// Reads artifacts from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsArtifactStore {
    base_dir: Option<PathBuf>,
}

impl FsArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative entries against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Path that `entry` refers to.
    pub fn resolve(&self, entry: &ResultEntry) -> PathBuf {
        let path = Path::new(entry.as_str());
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn fetch(&self, entry: &ResultEntry) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(entry);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(StoreError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory store keyed by entry text.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the artifact for `id`.
    pub fn insert(&self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut artifacts) = self.artifacts.write() {
            artifacts.insert(id.into(), bytes.into());
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn fetch(&self, entry: &ResultEntry) -> Result<Vec<u8>, StoreError> {
        self.artifacts
            .read()
            .ok()
            .and_then(|artifacts| artifacts.get(entry.as_str()).cloned())
            .ok_or_else(|| StoreError::NotFound(entry.to_string()))
    }
}
