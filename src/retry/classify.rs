//! Default classification of flow errors for retry decisions.

use crate::error::FlowError;
use crate::retry::policy::ErrorKind;

/// Stage failures are transient. An unmatched recovery is classified by the
/// stage error it wraps. Exhausted result retries are permanent.
pub fn classify(err: &FlowError) -> ErrorKind {
    match err {
        FlowError::Stage(_) => ErrorKind::Transient,
        FlowError::NoMatchingRecovery { source } => classify(source),
        FlowError::MaxRetriesExceeded { .. } => ErrorKind::Permanent,
    }
}
