//! Flow decorators that recover from failure with a fallback flow.

use crate::error::{FlowError, FlowResult};
use crate::flow::Flow;

/// See [`Flow::try_recover`] and [`Flow::with_recover`].
#[derive(Debug, Clone)]
pub struct TryRecover<F, S, E, R> {
    inner: F,
    on_success: S,
    on_failure: E,
    recover: R,
}

impl<F, S, E, R> TryRecover<F, S, E, R> {
    pub(crate) fn new(inner: F, on_success: S, on_failure: E, recover: R) -> Self {
        Self {
            inner,
            on_success,
            on_failure,
            recover,
        }
    }
}

impl<In, F, S, E, R, G> Flow<In> for TryRecover<F, S, E, R>
where
    In: Clone,
    F: Flow<In>,
    S: Fn(&F::Out),
    E: Fn(&FlowError),
    R: Fn(FlowError) -> FlowResult<G>,
    G: Flow<In, Out = F::Out>,
{
    type Out = F::Out;

    fn apply(&self, input: In) -> FlowResult<F::Out> {
        match self.inner.apply(input.clone()) {
            Ok(out) => {
                (self.on_success)(&out);
                Ok(out)
            }
            Err(err) => {
                (self.on_failure)(&err);
                (self.recover)(err)?.apply(input)
            }
        }
    }
}

/// See [`Flow::try_recover_with_input`].
#[derive(Debug, Clone)]
pub struct TryRecoverWithInput<F, S, E, R> {
    inner: F,
    on_success: S,
    on_failure: E,
    recover: R,
}

impl<F, S, E, R> TryRecoverWithInput<F, S, E, R> {
    pub(crate) fn new(inner: F, on_success: S, on_failure: E, recover: R) -> Self {
        Self {
            inner,
            on_success,
            on_failure,
            recover,
        }
    }
}

impl<In, F, S, E, R, G> Flow<In> for TryRecoverWithInput<F, S, E, R>
where
    In: Clone,
    F: Flow<In>,
    S: Fn(&In, &F::Out),
    E: Fn(&FlowError),
    R: Fn(FlowError) -> FlowResult<G>,
    G: Flow<In, Out = F::Out>,
{
    type Out = F::Out;

    fn apply(&self, input: In) -> FlowResult<F::Out> {
        match self.inner.apply(input.clone()) {
            Ok(out) => {
                (self.on_success)(&input, &out);
                Ok(out)
            }
            Err(err) => {
                (self.on_failure)(&err);
                (self.recover)(err)?.apply(input)
            }
        }
    }
}
