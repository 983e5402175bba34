//! Ordered error-to-fallback matching.

use std::fmt;
use std::sync::Arc;

use crate::error::{FlowError, FlowResult};

type Matcher = Arc<dyn Fn(&FlowError) -> bool + Send + Sync>;

/// Ordered list of `error matcher -> fallback` cases.
///
/// `F` is usually a flow (often a [`crate::SharedFlow`] when cases need
/// different fallback types), but any cloneable value works.
pub struct RecoverStrategy<F> {
    cases: Vec<(Matcher, F)>,
}

impl<F> RecoverStrategy<F> {
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// A strategy that recovers every error with `fallback`.
    pub fn of_any(fallback: F) -> Self {
        Self::new().on_when(|_| true, fallback)
    }

    /// Recover errors that are (or wrap) a stage error of type `E`.
    pub fn on<E>(self, fallback: F) -> Self
    where
        E: std::error::Error + 'static,
    {
        self.on_when(FlowError::is::<E>, fallback)
    }

    /// Recover errors for which `matches` returns true.
    pub fn on_when<M>(mut self, matches: M, fallback: F) -> Self
    where
        M: Fn(&FlowError) -> bool + Send + Sync + 'static,
    {
        self.cases.push((Arc::new(matches), fallback));
        self
    }

    pub fn is_defined_at(&self, err: &FlowError) -> bool {
        self.cases.iter().any(|(matches, _)| matches(err))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<F: Clone> RecoverStrategy<F> {
    /// Fallback of the first case matching `err`, or
    /// [`FlowError::NoMatchingRecovery`] wrapping `err`.
    pub fn apply(&self, err: FlowError) -> FlowResult<F> {
        match self.cases.iter().find(|(matches, _)| matches(&err)) {
            Some((_, fallback)) => Ok(fallback.clone()),
            None => Err(FlowError::NoMatchingRecovery {
                source: Box::new(err),
            }),
        }
    }
}

impl<F> Default for RecoverStrategy<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Clone> Clone for RecoverStrategy<F> {
    fn clone(&self) -> Self {
        Self {
            cases: self.cases.clone(),
        }
    }
}

impl<F> fmt::Debug for RecoverStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoverStrategy")
            .field("cases", &self.cases.len())
            .finish()
    }
}
