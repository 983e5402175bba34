//! Flows: fallible single-input stages that compose into pipelines.
//!
//! ```text
//! source ~~> flow ~~> flow ~~> sink
//! ```
//!
//! Any `Fn(In) -> FlowResult<Out>` is a flow. Combinators on [`Flow`] build
//! larger flows (`via`), decorate them (`with_retry`, `with_recover`,
//! `try_recover`, `named`) or erase their type (`shared`). A flow whose input
//! is `()` is a [`Source`] and can be drained into a [`Sink`] with
//! [`Source::to`].

mod combinators;
mod shared;
mod sink;

pub use combinators::{Identity, Just, Map, Named, Via};
pub use shared::SharedFlow;
pub use sink::{Sink, Source};

use crate::error::{FlowError, FlowResult};
use crate::recover::{TryRecover, TryRecoverWithInput};
use crate::retry::{Retry, WithRetry};

/// A fallible stage turning one `In` into one `Out`.
pub trait Flow<In> {
    type Out;

    fn apply(&self, input: In) -> FlowResult<Self::Out>;

    /// Feed this flow's output into `next`.
    fn via<F>(self, next: F) -> Via<Self, F>
    where
        Self: Sized,
        F: Flow<Self::Out>,
    {
        Via::new(self, next)
    }

    /// Run every application inside a tracing span called `name`.
    fn named(self, name: impl Into<String>) -> Named<Self>
    where
        Self: Sized,
    {
        Named::new(name.into(), self)
    }

    /// Erase the concrete type behind a cloneable handle.
    fn shared(self) -> SharedFlow<In, Self::Out>
    where
        Self: Sized + Send + Sync + 'static,
    {
        SharedFlow::new(self)
    }

    /// Re-apply the flow to a clone of the input while `retry` allows it.
    fn with_retry(self, retry: Retry) -> WithRetry<Self, fn(&Self::Out) -> bool>
    where
        Self: Sized,
    {
        WithRetry::new(self, retry, accept_any::<Self::Out> as fn(&Self::Out) -> bool)
    }

    /// Like [`Flow::with_retry`], and also retry successful results for which
    /// `retry_on_result` returns true.
    fn with_retry_when<P>(self, retry: Retry, retry_on_result: P) -> WithRetry<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Out) -> bool,
    {
        WithRetry::new(self, retry, retry_on_result)
    }

    /// On failure, log a warning and apply the fallback flow chosen by
    /// `recover` to the same input.
    #[allow(clippy::type_complexity)]
    fn with_recover<R, G>(
        self,
        recover: R,
    ) -> TryRecover<Self, fn(&Self::Out), fn(&FlowError), R>
    where
        Self: Sized,
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out = Self::Out>,
    {
        TryRecover::new(
            self,
            ignore_output::<Self::Out> as fn(&Self::Out),
            crate::recover::warn_recovering as fn(&FlowError),
            recover,
        )
    }

    /// On success call `on_success`; on failure call `on_failure`, then
    /// recover with the fallback flow chosen by `recover`.
    fn try_recover<S, E, R, G>(
        self,
        on_success: S,
        on_failure: E,
        recover: R,
    ) -> TryRecover<Self, S, E, R>
    where
        Self: Sized,
        S: Fn(&Self::Out),
        E: Fn(&FlowError),
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out = Self::Out>,
    {
        TryRecover::new(self, on_success, on_failure, recover)
    }

    /// [`Flow::try_recover`] with a success callback that also sees the input.
    fn try_recover_with_input<S, E, R, G>(
        self,
        on_success: S,
        on_failure: E,
        recover: R,
    ) -> TryRecoverWithInput<Self, S, E, R>
    where
        Self: Sized,
        S: Fn(&In, &Self::Out),
        E: Fn(&FlowError),
        R: Fn(FlowError) -> FlowResult<G>,
        G: Flow<In, Out = Self::Out>,
    {
        TryRecoverWithInput::new(self, on_success, on_failure, recover)
    }
}

impl<In, Out, F> Flow<In> for F
where
    F: Fn(In) -> FlowResult<Out>,
{
    type Out = Out;

    fn apply(&self, input: In) -> FlowResult<Out> {
        self(input)
    }
}

/// A flow that ignores its input and yields a clone of `value`.
pub fn source<In, T: Clone>(value: T) -> Just<In, T> {
    Just::new(value)
}

/// A flow that passes its input through unchanged.
pub fn identity<T>() -> Identity<T> {
    Identity::new()
}

/// Lift an infallible function into a flow.
pub fn map<F>(f: F) -> Map<F> {
    Map::new(f)
}

fn accept_any<T>(_: &T) -> bool {
    false
}

fn ignore_output<T>(_: &T) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::ParseFloatError;

    fn parse_f64(s: String) -> FlowResult<f64> {
        s.parse::<f64>().map_err(FlowError::stage)
    }

    #[test]
    fn closures_are_flows() {
        let double = |x: i32| -> FlowResult<i32> { Ok(x * 2) };
        assert_eq!(double.apply(21).unwrap(), 42);
    }

    #[test]
    fn via_feeds_output_forward() {
        let flow = parse_f64.via(|x: f64| -> FlowResult<f64> { Ok(x * 2.0) });
        assert_eq!(flow.apply("1.25".to_string()).unwrap(), 2.5);
    }

    #[test]
    fn via_short_circuits_on_failure() {
        let flow = parse_f64.via(|_: f64| -> FlowResult<f64> { panic!("must not run") });
        let err = flow.apply("not a number".to_string()).unwrap_err();
        assert!(err.is::<ParseFloatError>());
    }

    #[test]
    fn identity_returns_input() {
        assert_eq!(identity().apply("123456.654321").unwrap(), "123456.654321");
    }

    #[test]
    fn source_ignores_input_of_any_type() {
        let unit = source(String::from("fallback"));
        assert_eq!(unit.apply(()).unwrap(), "fallback");
        let keyed = source(String::from("fallback"));
        assert_eq!(keyed.apply(7u8).unwrap(), "fallback");
    }

    #[test]
    fn map_lifts_infallible_function() {
        let len = map(|s: &str| s.len());
        assert_eq!(len.apply("four").unwrap(), 4);
    }

    #[test]
    fn named_flow_keeps_result() {
        let flow = parse_f64.named("parse");
        assert_eq!(flow.apply("2".to_string()).unwrap(), 2.0);
        assert!(flow.apply("x".to_string()).is_err());
    }
}
