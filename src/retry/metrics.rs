//! Per-instance retry outcome counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters shared by all clones of a [`super::Retry`].
#[derive(Debug, Default)]
pub struct RetryMetrics {
    successful_without_retry: AtomicU64,
    successful_with_retry: AtomicU64,
    failed_without_retry: AtomicU64,
    failed_with_retry: AtomicU64,
}

/// Point-in-time copy of [`RetryMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryMetricsSnapshot {
    pub successful_without_retry: u64,
    pub successful_with_retry: u64,
    pub failed_without_retry: u64,
    pub failed_with_retry: u64,
}

impl RetryMetrics {
    pub(crate) fn record_success(&self, attempts: u32) {
        if attempts > 1 {
            self.successful_with_retry.fetch_add(1, Ordering::Relaxed);
        } else {
            self.successful_without_retry.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_failure(&self, attempts: u32) {
        if attempts > 1 {
            self.failed_with_retry.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_without_retry.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> RetryMetricsSnapshot {
        RetryMetricsSnapshot {
            successful_without_retry: self.successful_without_retry.load(Ordering::Relaxed),
            successful_with_retry: self.successful_with_retry.load(Ordering::Relaxed),
            failed_without_retry: self.failed_without_retry.load(Ordering::Relaxed),
            failed_with_retry: self.failed_with_retry.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_decide_bucket() {
        let m = RetryMetrics::default();
        m.record_success(1);
        m.record_success(3);
        m.record_success(2);
        m.record_failure(1);
        m.record_failure(4);
        assert_eq!(
            m.snapshot(),
            RetryMetricsSnapshot {
                successful_without_retry: 1,
                successful_with_retry: 2,
                failed_without_retry: 1,
                failed_with_retry: 1,
            }
        );
    }
}
