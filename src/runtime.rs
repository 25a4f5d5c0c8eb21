use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::{CpuPool, PanicHandler};
use parking_lot::RwLock;
use std::sync::Arc;

/// Worker pool plus the settings parallel pipelines read when they plan partitions.
#[derive(Debug)]
pub struct Runtime {
    pub(crate) pool: CpuPool,
    pub(crate) panic_handler: Arc<PanicHandler>,
    config: Config,
}

impl Runtime {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let pool = CpuPool::new(&config)?;
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));

        Ok(Self {
            pool,
            panic_handler,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    /// Panics caught in partitions since this runtime started.
    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }
}

// Global runtime for the simple API
static GLOBAL_RUNTIME: RwLock<Option<Arc<Runtime>>> = RwLock::new(None);

pub fn init() -> Result<()> {
    init_with_config(Config::default())
}

pub fn init_with_config(config: Config) -> Result<()> {
    let mut runtime = GLOBAL_RUNTIME.write();

    if runtime.is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let rt = Runtime::new(config)?;
    tracing::info!(threads = rt.num_threads(), "global runtime initialized");
    *runtime = Some(Arc::new(rt));

    Ok(())
}

/// Returns the global runtime, starting one with the default config on first use.
pub fn global() -> Result<Arc<Runtime>> {
    if let Some(rt) = GLOBAL_RUNTIME.read().as_ref() {
        return Ok(rt.clone());
    }

    let mut runtime = GLOBAL_RUNTIME.write();
    if let Some(rt) = runtime.as_ref() {
        return Ok(rt.clone());
    }

    let rt = Arc::new(Runtime::new(Config::default())?);
    tracing::info!(threads = rt.num_threads(), "global runtime started lazily");
    *runtime = Some(rt.clone());

    Ok(rt)
}

pub fn is_initialized() -> bool {
    GLOBAL_RUNTIME.read().is_some()
}

/// Drops the global runtime. Evaluations already holding it finish first.
pub fn shutdown() {
    let previous = GLOBAL_RUNTIME.write().take();
    if previous.is_some() {
        tracing::info!("global runtime shut down");
    }
}
