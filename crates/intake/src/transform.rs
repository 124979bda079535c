//! Pluggable per-item transforms.
//!
//! A [`Transform`] is applied to every successfully-read item. Its error
//! type is a closed two-kind sum: [`TransformError::Skip`] opts the item
//! out (terminal status `Skipped`, not a failure), while
//! [`TransformError::Failed`] is a genuine failure (terminal status
//! `DoneFail`). Downstream consumers can therefore tell "not applicable"
//! apart from "broken" without inspecting messages.
//!
//! Both delivery paths of the original contract are preserved: an error
//! returned synchronously (before any await point, e.g. from a closure
//! wrapped by [`transform_fn`]) classifies exactly like an asynchronous
//! rejection.

use crate::source::FileSource;
use async_trait::async_trait;
use thiserror::Error;

/// Error kind carried through the per-item pipeline by a transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Exclude this item without treating it as a failure.
    #[error("{}", .reason.as_deref().unwrap_or("file skipped"))]
    Skip {
        /// Optional human-readable reason; diagnostics only, never stored
        /// on the item.
        reason: Option<String>,
    },

    /// A genuine transform failure; the message is recorded on the item.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TransformError {
    /// Create a skip signal with no reason.
    pub fn skip() -> Self {
        Self::Skip { reason: None }
    }

    /// Create a skip signal with a reason.
    pub fn skip_with_reason<S: Into<String>>(reason: S) -> Self {
        Self::Skip {
            reason: Some(reason.into()),
        }
    }

    /// Create a failure.
    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a failure with an underlying source error.
    pub fn failed_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this is the distinguished skip kind.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }
}

/// A user-supplied mapping applied to each successfully-read item.
///
/// Implementations receive the raw content and a reference to the item's
/// source (the opaque raw handle). They may suspend; the orchestrator
/// awaits settlement per item without gating sibling items.
#[async_trait]
pub trait Transform: Send + Sync {
    /// The value stored in `Item::contents` on success.
    type Output: Send + 'static;

    async fn apply(&self, content: Vec<u8>, source: &dyn FileSource) -> Result<Self::Output, TransformError>;
}

/// Adapter wrapping a plain synchronous closure as a [`Transform`].
///
/// This is the synchronous-return path: the closure runs to completion
/// before any await point, and an `Err` it returns is classified the same
/// way as an asynchronous rejection.
pub struct FnTransform<F> {
    f: F,
}

/// Wrap a synchronous closure `(content, source) -> Result<T, TransformError>`.
pub fn transform_fn<F, T>(f: F) -> FnTransform<F>
where
    F: Fn(Vec<u8>, &dyn FileSource) -> Result<T, TransformError> + Send + Sync,
    T: Send + 'static,
{
    FnTransform { f }
}

#[async_trait]
impl<F, T> Transform for FnTransform<F>
where
    F: Fn(Vec<u8>, &dyn FileSource) -> Result<T, TransformError> + Send + Sync,
    T: Send + 'static,
{
    type Output = T;

    async fn apply(&self, content: Vec<u8>, source: &dyn FileSource) -> Result<T, TransformError> {
        (self.f)(content, source)
    }
}
