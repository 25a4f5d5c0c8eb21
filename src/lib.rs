//! seqflow - lazy sequence pipelines with sequential and parallel execution
//!
//! Build a chain of transformations over a finite source, then evaluate it
//! with a terminal operation. Sequential pipelines run on the caller thread in
//! strict order; parallel pipelines split the source into contiguous
//! partitions evaluated on a work-stealing pool.
//!
//! # Quick Start
//!
//! ```no_run
//! use seqflow::prelude::*;
//!
//! let sum = (1i32..=3).into_seq().reduce(0, |a, b| a + b).unwrap();
//! assert_eq!(sum, 6);
//!
//! let ages = vec![18, 23, 23, 12];
//! let total = ages
//!     .into_par_seq()
//!     .reduce_combined(0, |sum, age| sum + age, |a, b| a + b)
//!     .unwrap();
//! assert_eq!(total, 76);
//!
//! let joined = vec!["USA", "Japan", "France"]
//!     .into_seq()
//!     .join_strings(", ", |s| s.to_uppercase())
//!     .unwrap();
//! assert_eq!(joined, "USA, JAPAN, FRANCE");
//! ```
//!
//! # Features
//!
//! - **Lazy stages**: `map`, `filter`, `distinct`, `inspect` and fallible variants
//! - **Reductions**: sequential fold, combiner-based parallel fold, identity-free reduce
//! - **Collectors**: `group_by`, `summary_statistics`, `join_strings`, `collect`
//! - **Short-circuit matching**: `any_match`, `all_match`, `none_match`
//! - **Failure propagation**: errors and worker panics surface at the terminal call

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod iter;
pub mod prelude;
pub mod runtime;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use iter::{ExecutionMode, GroupedResult, IntoSequence, Pipeline, Sequence, SummaryStats};
pub use runtime::{init, init_with_config, shutdown, Runtime};
