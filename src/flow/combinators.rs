//! Basic flow building blocks: sequencing, naming, constants and lifting.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::time::Instant;

use super::Flow;
use crate::error::FlowResult;

/// `first` followed by `next`. See [`Flow::via`].
#[derive(Debug, Clone)]
pub struct Via<A, B> {
    first: A,
    next: B,
}

impl<A, B> Via<A, B> {
    pub(crate) fn new(first: A, next: B) -> Self {
        Self { first, next }
    }
}

impl<In, A, B> Flow<In> for Via<A, B>
where
    A: Flow<In>,
    B: Flow<A::Out>,
{
    type Out = B::Out;

    fn apply(&self, input: In) -> FlowResult<B::Out> {
        let start = Instant::now();
        let out = self.next.apply(self.first.apply(input)?)?;
        tracing::debug!(
            stage = type_name::<B>(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flow stage completed"
        );
        Ok(out)
    }
}

/// A flow applied inside a tracing span. See [`Flow::named`].
#[derive(Debug, Clone)]
pub struct Named<F> {
    name: String,
    inner: F,
}

impl<F> Named<F> {
    pub(crate) fn new(name: String, inner: F) -> Self {
        Self { name, inner }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<In, F> Flow<In> for Named<F>
where
    F: Flow<In>,
{
    type Out = F::Out;

    fn apply(&self, input: In) -> FlowResult<F::Out> {
        let span = tracing::debug_span!("flow", name = %self.name);
        let _enter = span.enter();
        let result = self.inner.apply(input);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "flow failed");
        }
        result
    }
}

/// Constant flow. See [`super::source`].
pub struct Just<In, T> {
    value: T,
    _input: PhantomData<fn(In)>,
}

impl<In, T> Just<In, T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            _input: PhantomData,
        }
    }
}

impl<In, T: Clone> Clone for Just<In, T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<In, T: fmt::Debug> fmt::Debug for Just<In, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Just").field(&self.value).finish()
    }
}

impl<In, T: Clone> Flow<In> for Just<In, T> {
    type Out = T;

    fn apply(&self, _input: In) -> FlowResult<T> {
        Ok(self.value.clone())
    }
}

/// Pass-through flow. See [`super::identity`].
pub struct Identity<T>(PhantomData<fn(T) -> T>);

impl<T> Identity<T> {
    pub(crate) fn new() -> Self {
        Identity(PhantomData)
    }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identity")
    }
}

impl<T> Flow<T> for Identity<T> {
    type Out = T;

    fn apply(&self, input: T) -> FlowResult<T> {
        Ok(input)
    }
}

/// Infallible function lifted into a flow. See [`super::map`].
#[derive(Debug, Clone)]
pub struct Map<F>(F);

impl<F> Map<F> {
    pub(crate) fn new(f: F) -> Self {
        Map(f)
    }
}

impl<In, Out, F> Flow<In> for Map<F>
where
    F: Fn(In) -> Out,
{
    type Out = Out;

    fn apply(&self, input: In) -> FlowResult<Out> {
        Ok((self.0)(input))
    }
}
