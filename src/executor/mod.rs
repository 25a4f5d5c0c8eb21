//! Task execution infrastructure.
//!
//! Worker threads with work-stealing deques, the CPU pool that owns them,
//! and the panic guard that turns a panicking partition into an error.

pub mod cpu_pool;
pub mod panic_handler;
pub mod task;
pub mod worker;

pub use cpu_pool::CpuPool;
pub use panic_handler::{PanicHandler, PanicReport, PanicStrategy};
pub use worker::current_worker;

pub(crate) use task::Task;
