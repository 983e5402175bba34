//! Retry and backoff policy.
//!
//! A [`Retry`] is a named instance combining a [`RetryPolicy`] (attempts and
//! backoff), an error classifier and outcome metrics. Flows use it through
//! `with_retry`; plain closures through [`Retry::run`] or
//! [`Retry::run_async`]. [`RetryRegistry`] builds instances from config.

mod classify;
mod decorate;
mod metrics;
mod policy;
mod registry;
mod run;

pub use classify::classify;
pub use decorate::WithRetry;
pub use metrics::{RetryMetrics, RetryMetricsSnapshot};
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryPolicy};
pub use registry::RetryRegistry;
pub use run::Retry;
