//! The batch orchestrator: state machine, pipeline, queries.

use crate::error::{IntakeError, Result};
use crate::events::{EventKind, Hooks};
use crate::source::FileSource;
use crate::transform::{Transform, TransformError, transform_fn};
use crate::types::{Item, ItemStatus, Progress};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome of one item's read-then-transform pipeline, classified before
/// it is recorded on the item.
enum Outcome<T> {
    Ok(T),
    Skip(Option<String>),
    Fail(String),
}

/// Mutable batch state, guarded by the orchestrator's single mutex.
struct BatchState<T> {
    items: Vec<Item<T>>,
    /// Explicit completion barrier: decremented exactly once per terminal
    /// transition; `finish` fires when it reaches zero.
    pending: usize,
    running: bool,
}

impl<T> BatchState<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            pending: 0,
            running: false,
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            total: self.items.len(),
            finished: self.items.len() - self.pending,
            pending: self.pending,
        }
    }

    /// Record a terminal outcome for one item and emit its event tail.
    /// Returns `true` when this transition completed the batch.
    fn complete(&mut self, index: usize, outcome: Outcome<T>, hooks: &Hooks<T>) -> bool {
        debug_assert!(self.items[index].status.is_pending(), "terminal states are final");

        let (status, event) = match outcome {
            Outcome::Ok(value) => {
                self.items[index].contents = Some(value);
                (ItemStatus::DoneOk, EventKind::AfterFileOk)
            }
            Outcome::Skip(reason) => {
                if let Some(reason) = reason {
                    tracing::debug!(file = %self.items[index].name, reason, "file skipped");
                }
                (ItemStatus::Skipped, EventKind::AfterFileSkip)
            }
            Outcome::Fail(message) => {
                tracing::debug!(file = %self.items[index].name, error = %message, "file failed");
                self.items[index].error = Some(message);
                (ItemStatus::DoneFail, EventKind::AfterFileFail)
            }
        };
        self.items[index].status = status;

        hooks.emit_file(event, &self.items[index], index);
        hooks.emit_file(EventKind::AfterFile, &self.items[index], index);

        self.pending -= 1;
        hooks.emit_progress(self.progress());

        if self.pending == 0 {
            tracing::info!(total = self.items.len(), "batch finished");
            hooks.emit_batch(EventKind::Finish, &self.items);
            true
        } else {
            false
        }
    }
}

/// The batch orchestrator.
///
/// An `Intake` owns one optional transform and one hook table, and runs
/// one batch at a time; starting a second batch while one is pending is a
/// configuration error. Query methods reflect the most recent batch and
/// may be called while it is running.
///
/// `T` is the transform output type stored in `Item::contents`.
///
/// # Example
///
/// ```rust,no_run
/// use intake::{FileSource, Hooks, Intake, PathSource};
/// use std::sync::Arc;
///
/// # async fn example() -> intake::Result<()> {
/// let intake = Intake::new().hooks(Hooks::new().on_progress(|p| {
///     println!("{}/{} done", p.finished, p.total);
/// }));
/// let items = intake
///     .process(vec![Arc::new(PathSource::new("data.tsv")) as Arc<dyn FileSource>])
///     .await?;
/// println!("{} items", items.len());
/// # Ok(())
/// # }
/// ```
pub struct Intake<T> {
    transform: Arc<dyn Transform<Output = T>>,
    hooks: Arc<Hooks<T>>,
    state: Arc<Mutex<BatchState<T>>>,
}

impl Intake<Vec<u8>> {
    /// An orchestrator with no transform: each item's contents are the raw
    /// bytes of the read.
    pub fn new() -> Self {
        Self::with_transform(transform_fn(|content: Vec<u8>, _source: &dyn FileSource| Ok(content)))
    }
}

impl Default for Intake<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Intake<T> {
    /// An orchestrator applying `transform` to every successfully-read
    /// item.
    pub fn with_transform(transform: impl Transform<Output = T> + 'static) -> Self {
        Self {
            transform: Arc::new(transform),
            hooks: Arc::new(Hooks::new()),
            state: Arc::new(Mutex::new(BatchState::empty())),
        }
    }

    /// Install the hook table. Replaces any previously installed hooks.
    pub fn hooks(mut self, hooks: Hooks<T>) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }
}

impl<T: Clone + Send + 'static> Intake<T> {
    /// Process a batch of sources to completion.
    ///
    /// Emits `start` and an initial `progress`, then drives every item
    /// through its pipeline concurrently. The returned future resolves
    /// with the full item list once every item is terminal; per-item
    /// failures never fail the batch.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Configuration` if a batch is already pending
    /// on this orchestrator, and `IntakeError::TaskPanic` if a worker
    /// task panicked.
    pub async fn process(&self, sources: Vec<Arc<dyn FileSource>>) -> Result<Vec<Item<T>>> {
        {
            let mut state = self.state.lock();
            if state.running {
                return Err(IntakeError::configuration(
                    "a batch is already being processed; wait for it to finish",
                ));
            }

            tracing::info!(files = sources.len(), "processing batch");
            for (index, source) in sources.iter().enumerate() {
                tracing::debug!(index, file = %source.name(), size = source.size_hint(), "queued");
            }

            state.items = sources.iter().map(|s| Item::new(Arc::clone(s))).collect();
            state.pending = state.items.len();
            state.running = true;

            self.hooks.emit_batch(EventKind::Start, &state.items);
            self.hooks.emit_progress(state.progress());

            // Vacuous completion barrier: nothing to wait for.
            if state.items.is_empty() {
                self.hooks.emit_batch(EventKind::Finish, &state.items);
                state.running = false;
                return Ok(Vec::new());
            }
        }

        let mut tasks = JoinSet::new();
        for (index, source) in sources.into_iter().enumerate() {
            let state = Arc::clone(&self.state);
            let hooks = Arc::clone(&self.hooks);
            let transform = Arc::clone(&self.transform);

            tasks.spawn(async move {
                {
                    let mut state = state.lock();
                    state.items[index].status = ItemStatus::InProgress;
                    hooks.emit_file(EventKind::BeforeFile, &state.items[index], index);
                }

                let outcome = match source.read().await {
                    Ok(content) => match transform.apply(content, source.as_ref()).await {
                        Ok(value) => Outcome::Ok(value),
                        Err(TransformError::Skip { reason }) => Outcome::Skip(reason),
                        Err(err) => Outcome::Fail(err.to_string()),
                    },
                    Err(err) => Outcome::Fail(err.to_string()),
                };

                state.lock().complete(index, outcome, &hooks);
            });
        }

        while let Some(task_result) = tasks.join_next().await {
            if let Err(join_err) = task_result {
                self.state.lock().running = false;
                return Err(IntakeError::TaskPanic(join_err.to_string()));
            }
        }

        let mut state = self.state.lock();
        state.running = false;
        Ok(state.items.clone())
    }

    /// All items of the most recent batch, in input order.
    pub fn items(&self) -> Vec<Item<T>> {
        self.state.lock().items.clone()
    }

    /// Total number of items in the most recent batch.
    pub fn count(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Items matching any of the given statuses, in status-argument order
    /// then input order.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Configuration` when `statuses` is empty.
    pub fn by_status(&self, statuses: &[ItemStatus]) -> Result<Vec<Item<T>>> {
        if statuses.is_empty() {
            return Err(IntakeError::configuration("missing file status(es)"));
        }

        let state = self.state.lock();
        let mut matched = Vec::new();
        for status in statuses {
            matched.extend(state.items.iter().filter(|item| item.status == *status).cloned());
        }
        Ok(matched)
    }

    /// Number of items matching any of the given statuses.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Configuration` when `statuses` is empty.
    pub fn count_by_status(&self, statuses: &[ItemStatus]) -> Result<usize> {
        Ok(self.by_status(statuses)?.len())
    }

    /// Number of items still `Waiting` or `InProgress`.
    pub fn count_pending(&self) -> usize {
        self.state
            .lock()
            .items
            .iter()
            .filter(|item| item.status.is_pending())
            .count()
    }

    /// Number of items in a terminal state.
    pub fn count_finished(&self) -> usize {
        self.state
            .lock()
            .items
            .iter()
            .filter(|item| item.status.is_terminal())
            .count()
    }
}
