//! Lifecycle events and listener hooks.
//!
//! The event set is a fixed, closed enumeration: one [`EventKind`] per
//! lifecycle point, and one optional typed callback per kind in
//! [`Hooks`]. Unknown event kinds are unrepresentable, so registration can
//! never fail at emit time; an unset hook is a no-op.
//!
//! Per item the orchestrator emits, in order:
//! `BeforeFile → AfterFile{Ok|Skip|Fail} → AfterFile → Progress`.
//! `Start` and one `Progress` open the batch; `Finish` closes it exactly
//! once. Across items no ordering is guaranteed.

use crate::types::{Item, Progress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of lifecycle event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Start,
    BeforeFile,
    AfterFileOk,
    AfterFileSkip,
    AfterFileFail,
    AfterFile,
    Finish,
    Progress,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::BeforeFile => "beforeFile",
            Self::AfterFileOk => "afterFileOk",
            Self::AfterFileSkip => "afterFileSkip",
            Self::AfterFileFail => "afterFileFail",
            Self::AfterFile => "afterFile",
            Self::Finish => "finish",
            Self::Progress => "progress",
        };
        f.write_str(name)
    }
}

/// Callback receiving the full item list (`Start`, `Finish`).
pub type BatchHook<T> = Box<dyn Fn(&[Item<T>]) + Send + Sync>;
/// Callback receiving one item and its index (per-file events).
pub type FileHook<T> = Box<dyn Fn(&Item<T>, usize) + Send + Sync>;
/// Callback receiving a progress snapshot.
pub type ProgressHook = Box<dyn Fn(Progress) + Send + Sync>;

/// One optional callback per event kind.
///
/// Hooks are invoked synchronously from the orchestrator's single mutation
/// point, so within one item the per-file sequence is never interleaved
/// with another item's. Hooks must not call back into the owning
/// orchestrator.
pub struct Hooks<T> {
    pub(crate) start: Option<BatchHook<T>>,
    pub(crate) before_file: Option<FileHook<T>>,
    pub(crate) after_file_ok: Option<FileHook<T>>,
    pub(crate) after_file_skip: Option<FileHook<T>>,
    pub(crate) after_file_fail: Option<FileHook<T>>,
    pub(crate) after_file: Option<FileHook<T>>,
    pub(crate) finish: Option<BatchHook<T>>,
    pub(crate) progress: Option<ProgressHook>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            start: None,
            before_file: None,
            after_file_ok: None,
            after_file_skip: None,
            after_file_fail: None,
            after_file: None,
            finish: None,
            progress: None,
        }
    }
}

impl<T> Hooks<T> {
    /// A hook table with every slot empty (all events are no-ops).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl Fn(&[Item<T>]) + Send + Sync + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_before_file(mut self, f: impl Fn(&Item<T>, usize) + Send + Sync + 'static) -> Self {
        self.before_file = Some(Box::new(f));
        self
    }

    pub fn on_after_file_ok(mut self, f: impl Fn(&Item<T>, usize) + Send + Sync + 'static) -> Self {
        self.after_file_ok = Some(Box::new(f));
        self
    }

    pub fn on_after_file_skip(mut self, f: impl Fn(&Item<T>, usize) + Send + Sync + 'static) -> Self {
        self.after_file_skip = Some(Box::new(f));
        self
    }

    pub fn on_after_file_fail(mut self, f: impl Fn(&Item<T>, usize) + Send + Sync + 'static) -> Self {
        self.after_file_fail = Some(Box::new(f));
        self
    }

    pub fn on_after_file(mut self, f: impl Fn(&Item<T>, usize) + Send + Sync + 'static) -> Self {
        self.after_file = Some(Box::new(f));
        self
    }

    pub fn on_finish(mut self, f: impl Fn(&[Item<T>]) + Send + Sync + 'static) -> Self {
        self.finish = Some(Box::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub(crate) fn emit_batch(&self, kind: EventKind, items: &[Item<T>]) {
        tracing::debug!(event = %kind, items = items.len(), "emitting batch event");
        let hook = match kind {
            EventKind::Start => &self.start,
            EventKind::Finish => &self.finish,
            _ => unreachable!("not a batch-level event: {kind}"),
        };
        if let Some(f) = hook {
            f(items);
        }
    }

    pub(crate) fn emit_file(&self, kind: EventKind, item: &Item<T>, index: usize) {
        tracing::debug!(event = %kind, file = %item.name, index, "emitting file event");
        let hook = match kind {
            EventKind::BeforeFile => &self.before_file,
            EventKind::AfterFileOk => &self.after_file_ok,
            EventKind::AfterFileSkip => &self.after_file_skip,
            EventKind::AfterFileFail => &self.after_file_fail,
            EventKind::AfterFile => &self.after_file,
            _ => unreachable!("not a file-level event: {kind}"),
        };
        if let Some(f) = hook {
            f(item, index);
        }
    }

    pub(crate) fn emit_progress(&self, progress: Progress) {
        tracing::debug!(
            event = %EventKind::Progress,
            total = progress.total,
            finished = progress.finished,
            pending = progress.pending,
            "emitting progress"
        );
        if let Some(f) = &self.progress {
            f(progress);
        }
    }
}
