//! Batch orchestration module.
//!
//! This module contains the batch state machine and per-item pipeline.
//! [`Intake`] owns the optional transform, the hook table and the state of
//! the current batch; [`Intake::process`] drives every item through
//! `Waiting → InProgress → {Skipped | DoneOk | DoneFail}` and resolves
//! once the completion barrier (all items terminal) is reached.
//!
//! # Concurrency model
//!
//! One tokio task per item: raw reads and transforms run with true
//! parallelism and may finish in any order. All status mutation and every
//! event emission happen under a single mutex, so within one item the
//! event sequence `beforeFile → afterFile{Ok|Skip|Fail} → afterFile →
//! progress` is never interleaved with another item's, and `finish` fires
//! exactly once when the explicit pending counter reaches zero.

pub mod orchestrator;

pub use orchestrator::Intake;
