pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::PanicStrategy;
pub use crate::iter::func::{and_then, compose};
pub use crate::iter::{ExecutionMode, GroupedResult, IntoSequence, Pipeline, Sequence, SummaryStats};
pub use crate::runtime::Runtime;

pub use crate::{init, init_with_config, shutdown};
