//! Flowline: composable fallible pipelines with retry and recovery.
//!
//! ```text
//! source ~~> flow ~~> flow ~~> sink
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod mix;
pub mod recover;
pub mod retry;

pub use error::{BoxError, FlowError, FlowResult};
pub use flow::{identity, map, source, Flow, SharedFlow, Sink, Source};
pub use mix::Mixable;
pub use recover::RecoverStrategy;
pub use retry::{Retry, RetryPolicy, RetryRegistry};
