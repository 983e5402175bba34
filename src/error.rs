//! Error type shared by every flow, retry and recovery operation.

use thiserror::Error;

/// Boxed error raised by a stage. Anything `Send + Sync` can fail a flow.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of applying a flow.
pub type FlowResult<T> = Result<T, FlowError>;

/// Failure of a flow application.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A stage failed. Displays as the underlying error.
    #[error(transparent)]
    Stage(BoxError),
    /// A recover strategy had no case for the error it was handed.
    #[error("no recovery case matches error: {source}")]
    NoMatchingRecovery {
        #[source]
        source: Box<FlowError>,
    },
    /// Result-based retry ran out of attempts and the instance is configured to fail.
    #[error("retry '{name}' exceeded max attempts ({attempts})")]
    MaxRetriesExceeded { name: String, attempts: u32 },
}

impl FlowError {
    /// Wrap a stage failure. Accepts error values as well as plain messages.
    pub fn stage<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        FlowError::Stage(err.into())
    }

    /// True when this error is, or wraps, a stage error of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: std::error::Error + 'static,
    {
        self.downcast_ref::<E>().is_some()
    }

    /// Borrow the stage error as `E`, looking through recovery wrappers.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FlowError::Stage(e) => e.downcast_ref::<E>(),
            FlowError::NoMatchingRecovery { source } => source.downcast_ref::<E>(),
            FlowError::MaxRetriesExceeded { .. } => None,
        }
    }
}
