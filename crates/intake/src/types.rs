//! Core data types for batch intake.
//!
//! An [`Item`] is one unit of a batch: one file source tracked through its
//! own status lifecycle. Items are created once when a batch starts, are
//! never added or removed afterwards, and are mutated only by the
//! orchestrator.

use crate::source::FileSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle status of a single item.
///
/// Transitions are `Waiting → InProgress → {Skipped | DoneOk | DoneFail}`;
/// the last three are terminal and no transition ever leaves them.
///
/// Serde names use the original camelCase wire strings (`doneOk`, etc.) so
/// serialized reports stay compatible with existing consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    /// Created, read not yet started.
    Waiting,
    /// Read (and possibly transform) in flight.
    InProgress,
    /// The transform opted the item out; not a failure.
    Skipped,
    /// Read and transform both succeeded.
    DoneOk,
    /// The read failed, or the transform failed with a non-skip error.
    DoneFail,
}

impl ItemStatus {
    /// Whether this status is terminal (`Skipped`, `DoneOk` or `DoneFail`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::DoneOk | Self::DoneFail)
    }

    /// Whether this status is still pending (`Waiting` or `InProgress`).
    pub fn is_pending(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::InProgress => "inProgress",
            Self::Skipped => "skipped",
            Self::DoneOk => "doneOk",
            Self::DoneFail => "doneFail",
        };
        f.write_str(name)
    }
}

/// One element of a batch.
///
/// Exactly one of `{contents set, error set, neither}` holds, correlated
/// with `status ∈ {DoneOk}`, `{DoneFail}`, `{Waiting, InProgress, Skipped}`
/// respectively.
///
/// `T` is the transform output type; `Vec<u8>` (the raw read) when no
/// transform is installed.
pub struct Item<T> {
    /// Display identifier, taken from the source.
    pub name: String,
    /// Current lifecycle status.
    pub status: ItemStatus,
    /// The underlying raw handle. The pipeline reads it exactly once;
    /// hooks and transforms may inspect it but never read it again.
    pub source: Arc<dyn FileSource>,
    /// Result of the read-then-transform pipeline; set only on `DoneOk`.
    pub contents: Option<T>,
    /// Human-readable failure reason; set only on `DoneFail`.
    pub error: Option<String>,
}

impl<T> Item<T> {
    /// Create a fresh `Waiting` item for a source.
    pub(crate) fn new(source: Arc<dyn FileSource>) -> Self {
        Self {
            name: source.name().to_string(),
            status: ItemStatus::Waiting,
            source,
            contents: None,
            error: None,
        }
    }
}

impl<T: Clone> Clone for Item<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status,
            source: Arc::clone(&self.source),
            contents: self.contents.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("contents", &self.contents)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Batch progress snapshot, emitted once at batch start and once after
/// every item reaches a terminal state.
///
/// Invariant: `finished + pending == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Number of items in the batch.
    pub total: usize,
    /// Items in a terminal state (`Skipped`, `DoneOk`, `DoneFail`).
    pub finished: usize,
    /// Items still `Waiting` or `InProgress`.
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_status_terminal_partition() {
        let all = [
            ItemStatus::Waiting,
            ItemStatus::InProgress,
            ItemStatus::Skipped,
            ItemStatus::DoneOk,
            ItemStatus::DoneFail,
        ];
        for status in all {
            assert_ne!(status.is_terminal(), status.is_pending());
        }
        assert!(ItemStatus::Skipped.is_terminal());
        assert!(ItemStatus::DoneOk.is_terminal());
        assert!(ItemStatus::DoneFail.is_terminal());
        assert!(ItemStatus::Waiting.is_pending());
        assert!(ItemStatus::InProgress.is_pending());
    }

    #[test]
    fn test_status_serde_uses_original_wire_names() {
        assert_eq!(serde_json::to_string(&ItemStatus::DoneOk).unwrap(), "\"doneOk\"");
        assert_eq!(serde_json::to_string(&ItemStatus::InProgress).unwrap(), "\"inProgress\"");
        let status: ItemStatus = serde_json::from_str("\"doneFail\"").unwrap();
        assert_eq!(status, ItemStatus::DoneFail);
    }

    #[test]
    fn test_new_item_is_waiting_and_empty() {
        let source = Arc::new(MemorySource::new("a.txt", b"abc".to_vec()));
        let item: Item<Vec<u8>> = Item::new(source);
        assert_eq!(item.name, "a.txt");
        assert_eq!(item.status, ItemStatus::Waiting);
        assert!(item.contents.is_none());
        assert!(item.error.is_none());
    }

    #[test]
    fn test_progress_invariant() {
        let progress = Progress {
            total: 5,
            finished: 2,
            pending: 3,
        };
        assert_eq!(progress.finished + progress.pending, progress.total);
    }
}
