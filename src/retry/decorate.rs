//! Retrying flow decorator.

use super::Retry;
use crate::error::FlowResult;
use crate::flow::Flow;

/// See [`Flow::with_retry`] and [`Flow::with_retry_when`].
#[derive(Debug, Clone)]
pub struct WithRetry<F, P> {
    inner: F,
    retry: Retry,
    retry_on_result: P,
}

impl<F, P> WithRetry<F, P> {
    pub(crate) fn new(inner: F, retry: Retry, retry_on_result: P) -> Self {
        Self {
            inner,
            retry,
            retry_on_result,
        }
    }

    pub fn retry(&self) -> &Retry {
        &self.retry
    }
}

impl<In, F, P> Flow<In> for WithRetry<F, P>
where
    In: Clone,
    F: Flow<In>,
    P: Fn(&F::Out) -> bool,
{
    type Out = F::Out;

    fn apply(&self, input: In) -> FlowResult<F::Out> {
        self.retry
            .run_when(|| self.inner.apply(input.clone()), &self.retry_on_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::flow::{source, Source};
    use crate::recover::RecoverStrategy;
    use std::io;
    use std::num::ParseIntError;
    use crate::retry::RetryPolicy;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::time::Duration;

    fn quick(attempts: u32) -> Retry {
        Retry::new("test", RetryPolicy::fixed(attempts, Duration::ZERO))
    }

    #[test]
    fn with_retry_recovers_from_two_failures() {
        let countdown = AtomicI32::new(4);
        let flaky = |_: ()| -> FlowResult<i32> {
            let i = countdown.fetch_sub(1, Ordering::SeqCst) - 1;
            if i > 1 {
                Err(FlowError::stage("runtime failure"))
            } else {
                Ok(i)
            }
        };
        flaky
            .with_retry(quick(3))
            .to(|v: i32| -> FlowResult<()> {
                assert_eq!(v, 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn each_attempt_sees_the_same_input() {
        let calls = AtomicI32::new(0);
        let flow = (|s: String| -> FlowResult<usize> {
            assert_eq!(s, "payload");
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FlowError::stage("first try fails"))
            } else {
                Ok(s.len())
            }
        })
        .with_retry(quick(2));
        assert_eq!(flow.apply("payload".to_string()).unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retry_reruns_recovered_flow_when_no_case_matches() {
        let calls = AtomicI32::new(0);
        let flaky = |_: ()| -> FlowResult<String> {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FlowError::stage(io::Error::new(io::ErrorKind::Other, "offline")))
            } else {
                Ok("ok".to_string())
            }
        };
        let strategy = RecoverStrategy::new().on::<ParseIntError>(source("parsed".to_string()));
        let flow = flaky
            .with_recover(move |e| strategy.apply(e))
            .with_retry(quick(3));
        assert_eq!(flow.apply(()).unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn with_retry_when_retries_rejected_results() {
        let calls = AtomicI32::new(0);
        let flow = (|_: ()| -> FlowResult<i32> { Ok(calls.fetch_add(1, Ordering::SeqCst)) })
            .with_retry_when(quick(5), |n: &i32| *n < 3);
        assert_eq!(flow.apply(()).unwrap(), 3);
        assert_eq!(flow.retry().metrics().snapshot().successful_with_retry, 1);
    }
}
