// src/storage/local.rs

//! Local filesystem state store.
//!
//! Keeps the baseline in a single JSON file. Writes go to a temp file
//! first and are renamed into place, so an interrupted run never leaves a
//! half-written state behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Reading;
use crate::storage::{StateStore, StoredReading};

/// State store backed by one file on disk.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Parse either the JSON format or a bare legacy integer.
    fn parse(&self, bytes: &[u8]) -> Result<Option<StoredReading>> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if let Ok(current) = text.parse::<u64>() {
            log::debug!("Read legacy integer state from {}", self.path.display());
            return Ok(Some(StoredReading {
                current,
                limit: None,
                observed_at: None,
            }));
        }

        serde_json::from_str(text).map(Some).map_err(|e| {
            AppError::persistence(format!("corrupt state file {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<StoredReading>> {
        match self.read_bytes().await? {
            Some(bytes) => self.parse(&bytes),
            None => {
                log::debug!("No state file at {}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, reading: &Reading) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&StoredReading::new(*reading))?;
        self.write_bytes(&bytes).await.map_err(|e| {
            AppError::persistence(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}
