//! Lazy sequence pipelines.
//!
//! A pipeline starts at a [`Sequence`], gains lazy stages through the
//! [`Pipeline`] combinators, and is evaluated by a terminal operation either
//! on the caller thread or across the runtime's worker pool.

pub mod combinators;
pub mod func;
pub mod partition;
pub mod seq_iter;
pub mod source;
pub mod stats;

pub use combinators::{Distinct, Filter, Inspect, Map, TryFilter, TryMap};
pub use partition::{Execution, Partitions};
pub use seq_iter::{GroupedResult, Pipeline};
pub use source::{ExecutionMode, IntoSequence, Sequence};
pub use stats::{StatSum, StatValue, SummaryStats};
