//! Pipeline endpoints: sources produce from `()`, sinks consume.

use std::any::type_name;
use std::time::Instant;

use super::Flow;
use crate::error::FlowResult;

/// Terminal stage of a pipeline.
///
/// A sink is not a [`Flow`], so a sink cannot be drained into another sink.
pub trait Sink<In> {
    fn accept(&self, input: In) -> FlowResult<()>;
}

impl<In, F> Sink<In> for F
where
    F: Fn(In) -> FlowResult<()>,
{
    fn accept(&self, input: In) -> FlowResult<()> {
        self(input)
    }
}

/// A flow that needs no input.
pub trait Source: Flow<()> {
    /// Run the source and hand its output to `sink`.
    fn to<S>(&self, sink: S) -> FlowResult<()>
    where
        S: Sink<Self::Out>,
    {
        let start = Instant::now();
        sink.accept(self.apply(())?)?;
        tracing::debug!(
            sink = type_name::<S>(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flow drained into sink"
        );
        Ok(())
    }
}

impl<F> Source for F where F: Flow<()> + ?Sized {}
