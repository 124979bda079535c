//! File sources: the opaque raw handle behind each batch item.
//!
//! A [`FileSource`] pairs a display name with a one-shot asynchronous read.
//! The orchestrator reads each source exactly once; transforms receive a
//! reference to the source alongside the raw content so they can inspect
//! the handle (name, size hint) without re-reading it.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// An opaque file handle: a display name plus a one-shot async read.
///
/// Implementations must be cheap to share (`Send + Sync`); the orchestrator
/// holds them as `Arc<dyn FileSource>` on the item for the batch lifetime.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Display identifier for the item (typically the file name).
    fn name(&self) -> &str;

    /// Read the raw contents. Called exactly once per batch.
    ///
    /// A failure here ends the item in `DoneFail` with the error message
    /// captured; it never aborts the batch.
    async fn read(&self) -> io::Result<Vec<u8>>;

    /// Size in bytes, when known up front. Diagnostics only.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

/// A source backed by a filesystem path, read via `tokio::fs`.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    /// Create a source for a path. The display name is the file name
    /// component, falling back to the full path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    /// The underlying path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }

    fn size_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

/// An in-memory source, for programmatic batches and tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    contents: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.contents.clone())
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.contents.len() as u64)
    }
}
