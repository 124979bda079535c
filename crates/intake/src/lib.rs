//! Intake - Batch File-Intake Orchestration
//!
//! Intake ingests a batch of file sources, reads each one concurrently,
//! optionally applies a pluggable (possibly asynchronous) transform to
//! each successfully-read item, and reports per-item and batch progress
//! through a fixed lifecycle-event set. Per-item failures never abort the
//! batch: every item ends in exactly one of `Skipped`, `DoneOk` or
//! `DoneFail`, and the batch resolves once all items are terminal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use intake::{FileSource, Hooks, Intake, PathSource, TabularTransform};
//! use std::sync::Arc;
//!
//! # async fn example() -> intake::Result<()> {
//! let intake = Intake::with_transform(TabularTransform).hooks(
//!     Hooks::new()
//!         .on_after_file_fail(|item, _| eprintln!("{}: {}", item.name, item.error.as_deref().unwrap_or("?")))
//!         .on_progress(|p| println!("{}/{}", p.finished, p.total)),
//! );
//!
//! let items = intake
//!     .process(vec![
//!         Arc::new(PathSource::new("a.tsv")) as Arc<dyn FileSource>,
//!         Arc::new(PathSource::new("b.tsv")),
//!     ])
//!     .await?;
//!
//! for item in &items {
//!     println!("{} -> {}", item.name, item.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Batch Module** (`batch`): the orchestrator — state machine,
//!   per-item async pipeline, completion barrier, status queries
//! - **Events** (`events`): closed event-kind set with one optional typed
//!   hook per kind
//! - **Sources** (`source`): the opaque raw handle behind each item
//! - **Transforms** (`transform`): pluggable per-item mapping with the
//!   skip/fail error distinction
//! - **Tabular** (`tabular`): pure grid reshape collaborator (TSV/CSV,
//!   header canonicalization, record round-trip)

#![deny(unsafe_code)]

pub mod batch;
pub mod error;
pub mod events;
pub mod source;
pub mod tabular;
pub mod transform;
pub mod types;

pub use batch::Intake;
pub use error::{IntakeError, Result};
pub use events::{EventKind, Hooks};
pub use source::{FileSource, MemorySource, PathSource};
pub use tabular::{Record, Tabular, TabularTransform};
pub use transform::{FnTransform, Transform, TransformError, transform_fn};
pub use types::{Item, ItemStatus, Progress};
