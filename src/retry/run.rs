//! Named retry instances and the retry loops that drive them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::classify;
use super::metrics::RetryMetrics;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::error::{FlowError, FlowResult};

type Classifier = Arc<dyn Fn(&FlowError) -> ErrorKind + Send + Sync>;

/// A named retry instance: policy, error classifier and outcome metrics.
///
/// Clones share the same metrics.
#[derive(Clone)]
pub struct Retry {
    name: Arc<str>,
    policy: RetryPolicy,
    classifier: Classifier,
    fail_after_max_attempts: bool,
    metrics: Arc<RetryMetrics>,
}

impl Retry {
    /// Instance with [`RetryPolicy::default`].
    pub fn of_defaults(name: impl Into<String>) -> Self {
        Self::new(name, RetryPolicy::default())
    }

    pub fn new(name: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            name: Arc::from(name.into()),
            policy,
            classifier: Arc::new(classify::classify),
            fail_after_max_attempts: false,
            metrics: Arc::new(RetryMetrics::default()),
        }
    }

    /// Only retry errors for which `pred` returns true.
    pub fn retry_on<P>(mut self, pred: P) -> Self
    where
        P: Fn(&FlowError) -> bool + Send + Sync + 'static,
    {
        self.classifier = Arc::new(move |err| {
            if pred(err) {
                ErrorKind::Transient
            } else {
                ErrorKind::Permanent
            }
        });
        self
    }

    /// Fail with [`FlowError::MaxRetriesExceeded`] instead of returning the
    /// last result when result-based retries run out.
    pub fn fail_after_max_attempts(mut self, fail: bool) -> Self {
        self.fail_after_max_attempts = fail;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> &RetryMetrics {
        &self.metrics
    }

    /// Runs `f` until it succeeds or the policy says to stop.
    /// On a retryable failure, sleeps for the backoff duration then tries again.
    pub fn run<T, F>(&self, f: F) -> FlowResult<T>
    where
        F: FnMut() -> FlowResult<T>,
    {
        self.run_when(f, |_| false)
    }

    /// [`Retry::run`], also retrying successful results for which
    /// `retry_on_result` returns true.
    pub fn run_when<T, F, P>(&self, mut f: F, retry_on_result: P) -> FlowResult<T>
    where
        F: FnMut() -> FlowResult<T>,
        P: Fn(&T) -> bool,
    {
        let mut attempt = 1u32;
        loop {
            let delay = match f() {
                Ok(out) => match self.after_result(attempt, retry_on_result(&out))? {
                    Some(d) => d,
                    None => return Ok(out),
                },
                Err(e) => match self.after_error(attempt, &e) {
                    Some(d) => d,
                    None => return Err(e),
                },
            };
            std::thread::sleep(delay);
            attempt += 1;
        }
    }

    /// Async [`Retry::run`]; waits with `tokio::time::sleep`.
    pub async fn run_async<T, F, Fut>(&self, mut f: F) -> FlowResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FlowResult<T>>,
    {
        let mut attempt = 1u32;
        loop {
            let delay = match f().await {
                Ok(out) => {
                    self.after_result(attempt, false)?;
                    return Ok(out);
                }
                Err(e) => match self.after_error(attempt, &e) {
                    Some(d) => d,
                    None => return Err(e),
                },
            };
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Delay before the next attempt, or `None` when `err` is final.
    fn after_error(&self, attempt: u32, err: &FlowError) -> Option<Duration> {
        let kind = (self.classifier)(err);
        match self.policy.decide(attempt, kind) {
            RetryDecision::RetryAfter(d) => {
                tracing::debug!(
                    retry = %self.name,
                    attempt,
                    delay_ms = d.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                Some(d)
            }
            RetryDecision::NoRetry => {
                self.metrics.record_failure(attempt);
                if kind == ErrorKind::Transient {
                    tracing::warn!(retry = %self.name, attempts = attempt, error = %err, "retries exhausted");
                } else {
                    tracing::debug!(retry = %self.name, attempts = attempt, error = %err, "error not retryable");
                }
                None
            }
        }
    }

    /// Delay before the next attempt, or `None` when the result is final.
    fn after_result(&self, attempt: u32, wants_retry: bool) -> FlowResult<Option<Duration>> {
        if !wants_retry {
            self.metrics.record_success(attempt);
            return Ok(None);
        }
        match self.policy.decide(attempt, ErrorKind::Transient) {
            RetryDecision::RetryAfter(d) => {
                tracing::debug!(
                    retry = %self.name,
                    attempt,
                    delay_ms = d.as_millis() as u64,
                    "result rejected, retrying"
                );
                Ok(Some(d))
            }
            RetryDecision::NoRetry => {
                self.metrics.record_failure(attempt);
                tracing::warn!(retry = %self.name, attempts = attempt, "result retries exhausted");
                if self.fail_after_max_attempts {
                    Err(FlowError::MaxRetriesExceeded {
                        name: self.name.to_string(),
                        attempts: attempt,
                    })
                } else {
                    Ok(None)
                }
            }
        }
    }
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("fail_after_max_attempts", &self.fail_after_max_attempts)
            .finish_non_exhaustive()
    }
}
