//! JSON file storage.
//!
//! Each store is one human-editable JSON document rewritten in full on every
//! mutation. Writes go to a sibling temp file which is synced and renamed over
//! the target, so a reader never observes a half-written document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::error::StoreError;

/// A JSON document on disk with ordered writes.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to `T::default()` when the file is
    /// missing, unreadable or not valid JSON.
    pub async fn load<T>(&self) -> T
    where
        T: DeserializeOwned + Default,
    {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, starting empty", self.path.display());
                return T::default();
            }
            Err(e) => {
                warn!("Failed to read {}: {}, starting empty", self.path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupt data in {}: {}, starting empty", self.path.display(), e);
                T::default()
            }
        }
    }

    /// Acquire the write turn for this file.
    ///
    /// Take the snapshot while holding the guard so writes land in the same
    /// order as the mutations they capture.
    pub async fn writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    /// Replace the file contents atomically. Callers must hold [`Self::writer`].
    pub async fn write(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let temp_path = self.path.with_extension("json.tmp");

        if let Err(e) = Self::replace(&temp_path, &self.path, bytes).await {
            // The temp file may not exist if creating it was what failed
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    async fn replace(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(temp_path, path).await?;
        Ok(())
    }
}

/// Result of a mutation that always applies in memory.
///
/// `flush` carries the outcome of persisting it.
#[derive(Debug)]
#[must_use]
pub struct Flushed<T> {
    pub value: T,
    pub flush: Result<(), StoreError>,
}

impl<T> Flushed<T> {
    pub fn new(value: T, flush: Result<(), StoreError>) -> Self {
        Self { value, flush }
    }

    /// Surface the write failure to the caller.
    pub fn into_result(self) -> Result<T, StoreError> {
        let Flushed { value, flush } = self;
        flush.map(|()| value)
    }

    /// Log a write failure and keep the value.
    pub fn logged(self, what: &str) -> T {
        if let Err(e) = &self.flush {
            warn!("Failed to persist {}: {}", what, e);
        }
        self.value
    }
}
