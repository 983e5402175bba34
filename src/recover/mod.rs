//! Recovery: replace a failed flow with a fallback chosen from the error.
//!
//! A [`RecoverStrategy`] maps error types to fallbacks, first match wins.
//! The `with_recover` / `try_recover` combinators on [`crate::Flow`] call a
//! recover function on failure and apply the fallback flow it returns to the
//! original input.

mod decorate;
mod strategy;

pub use decorate::{TryRecover, TryRecoverWithInput};
pub use strategy::RecoverStrategy;

use crate::error::FlowError;

/// Failure hook used by `with_recover`.
pub(crate) fn warn_recovering(err: &FlowError) {
    tracing::warn!(error = %err, "recovering from flow failure");
}
