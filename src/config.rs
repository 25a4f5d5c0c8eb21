use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: Option<usize>,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,

    /// Smallest number of source elements worth a partition of its own.
    pub min_partition_len: usize,
    /// Upper bound on partitions per worker thread for one evaluation.
    pub partitions_per_thread: usize,

    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "seqflow-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            min_partition_len: 1,
            partitions_per_thread: 4,
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::config("num_threads must be > 0"));
            }
            if n > 1024 {
                return Err(Error::config("num_threads too large (max 1024)"));
            }
        }

        if self.min_partition_len == 0 {
            return Err(Error::config("min_partition_len must be > 0"));
        }

        if self.partitions_per_thread == 0 {
            return Err(Error::config("partitions_per_thread must be > 0"));
        }

        if let Some(size) = self.stack_size {
            if size < 64 * 1024 {
                return Err(Error::config("stack_size must be at least 64 KiB"));
            }
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }

    /// Number of contiguous partitions a source of `len` elements is split into.
    pub fn partition_count(&self, len: usize) -> usize {
        let by_len = len / self.min_partition_len;
        let by_threads = self.worker_threads() * self.partitions_per_thread;
        by_len.min(by_threads).max(1)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn min_partition_len(mut self, len: usize) -> Self {
        self.config.min_partition_len = len;
        self
    }

    pub fn partitions_per_thread(mut self, n: usize) -> Self {
        self.config.partitions_per_thread = n;
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
