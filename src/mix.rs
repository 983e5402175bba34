//! Combining two sources through a binary function.
//!
//! ```text
//! +-------------------+
//! | Mixed source      |
//! |                   |
//! | first  ~~> In1    |
//! |           ~mix~   |~~> Out
//! | second ~~> In2    |
//! +-------------------+
//! ```

use std::any::type_name;
use std::fmt;
use std::time::Instant;

use crate::error::FlowResult;
use crate::flow::Flow;

/// A binary combiner that can mix two sources into one.
pub trait Mixable<In1, In2> {
    type Out;

    fn combine(&self, first: In1, second: In2) -> FlowResult<Self::Out>;

    /// Run both sources now (first, then second) and return a source that
    /// combines their outputs on every application.
    fn mix<A, B>(self, first: A, second: B) -> FlowResult<Mixed<Self, In1, In2>>
    where
        Self: Sized,
        A: Flow<(), Out = In1>,
        B: Flow<(), Out = In2>,
    {
        let first = first.apply(())?;
        let second = second.apply(())?;
        Ok(Mixed {
            mixer: self,
            first,
            second,
        })
    }
}

impl<In1, In2, Out, F> Mixable<In1, In2> for F
where
    F: Fn(In1, In2) -> FlowResult<Out>,
{
    type Out = Out;

    fn combine(&self, first: In1, second: In2) -> FlowResult<Out> {
        self(first, second)
    }
}

/// Source produced by [`Mixable::mix`].
#[derive(Clone)]
pub struct Mixed<M, In1, In2> {
    mixer: M,
    first: In1,
    second: In2,
}

impl<M, In1: fmt::Debug, In2: fmt::Debug> fmt::Debug for Mixed<M, In1, In2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixed")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish_non_exhaustive()
    }
}

impl<M, In1, In2> Flow<()> for Mixed<M, In1, In2>
where
    M: Mixable<In1, In2>,
    In1: Clone,
    In2: Clone,
{
    type Out = M::Out;

    fn apply(&self, _input: ()) -> FlowResult<M::Out> {
        let start = Instant::now();
        let out = self
            .mixer
            .combine(self.first.clone(), self.second.clone())?;
        tracing::debug!(
            mixer = type_name::<M>(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "mix completed"
        );
        Ok(out)
    }
}
