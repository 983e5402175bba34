//! Type-erased, cloneable flow handle.

use std::fmt;
use std::sync::Arc;

use super::Flow;
use crate::error::FlowResult;

/// A flow behind an `Arc`, so flows of different concrete types can be stored
/// side by side (e.g. as fallbacks in a recover strategy) and cloned cheaply.
pub struct SharedFlow<In, Out> {
    inner: Arc<dyn Flow<In, Out = Out> + Send + Sync>,
}

impl<In, Out> SharedFlow<In, Out> {
    pub fn new<F>(flow: F) -> Self
    where
        F: Flow<In, Out = Out> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(flow),
        }
    }
}

impl<In, Out> Clone for SharedFlow<In, Out> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<In, Out> fmt::Debug for SharedFlow<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFlow").finish_non_exhaustive()
    }
}

impl<In, Out> Flow<In> for SharedFlow<In, Out> {
    type Out = Out;

    fn apply(&self, input: In) -> FlowResult<Out> {
        self.inner.apply(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::flow::source;

    #[test]
    fn shared_flows_of_different_types_share_a_vec() {
        let flows: Vec<SharedFlow<(), String>> = vec![
            source(String::from("constant")).shared(),
            (|_: ()| -> FlowResult<String> { Ok("closure".into()) }).shared(),
        ];
        let outputs: Vec<String> = flows.iter().map(|f| f.apply(()).unwrap()).collect();
        assert_eq!(outputs, ["constant", "closure"]);
    }

    #[test]
    fn clones_point_at_same_flow() {
        let failing = (|_: ()| -> FlowResult<u8> { Err(FlowError::stage("nope")) }).shared();
        let copy = failing.clone();
        assert_eq!(copy.apply(()).unwrap_err().to_string(), "nope");
    }
}
