use super::task::Task;
use super::worker::{Worker, WorkerId, WorkerState};
use crate::config::Config;
use crate::error::{Error, Result};
use crossbeam_deque::{Injector, Stealer};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct CpuPool {
    workers: Vec<WorkerHandle>,
    injector: Arc<Injector<Task>>,
    shutdown: Arc<AtomicBool>,
    num_threads: usize,
    next_wake: AtomicUsize,
    tasks_submitted: AtomicU64,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
    unparker: thread::Thread,
    state: Arc<WorkerState>,
}

impl CpuPool {
    pub fn new(config: &Config) -> Result<Self> {
        let num_threads = config.worker_threads();
        if num_threads == 0 {
            return Err(Error::config("need at least 1 thread"));
        }

        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(num_threads);
        let mut stealers: Vec<Stealer<Task>> = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id);
            stealers.push(worker.local_queue.stealer());
            workers.push(worker);
        }

        let mut handles = Vec::with_capacity(num_threads);

        for worker in workers {
            let id = worker.id;
            let state = worker.state.clone();
            let stealers_clone = stealers.clone();
            let injector_clone = injector.clone();
            let shutdown_clone = shutdown.clone();
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let spawned = builder.spawn(move || {
                worker.run(stealers_clone, injector_clone, shutdown_clone);
            });

            let thread = match spawned {
                Ok(thread) => thread,
                Err(e) => {
                    // Stop the workers already started before bailing out.
                    let mut partial = Self {
                        workers: handles,
                        injector,
                        shutdown,
                        num_threads: id,
                        next_wake: AtomicUsize::new(0),
                        tasks_submitted: AtomicU64::new(0),
                    };
                    partial.shutdown();
                    return Err(Error::executor(format!("spawn failed: {}", e)));
                }
            };

            let unparker = thread.thread().clone();

            handles.push(WorkerHandle {
                id,
                thread: Some(thread),
                unparker,
                state,
            });
        }

        tracing::debug!(
            threads = num_threads,
            prefix = %config.thread_name_prefix,
            "worker pool started"
        );

        Ok(Self {
            workers: handles,
            injector,
            shutdown,
            num_threads,
            next_wake: AtomicUsize::new(0),
            tasks_submitted: AtomicU64::new(0),
        })
    }

    pub(crate) fn submit(&self, task: Task) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
        self.injector.push(task);

        // Wake up a worker
        let idx = self.next_wake.fetch_add(1, Ordering::Relaxed) % self.workers.len().max(1);
        if let Some(worker) = self.workers.get(idx) {
            worker.unparker.unpark();
        }
    }

    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::new(f));
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn tasks_submitted(&self) -> u64 {
        self.tasks_submitted.load(Ordering::Relaxed)
    }

    pub fn tasks_executed(&self) -> u64 {
        self.workers
            .iter()
            .map(|w| w.state.tasks_executed.load(Ordering::Relaxed))
            .sum()
    }

    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        // wake everyone up to check shutdown flag
        for worker in &self.workers {
            worker.unparker.unpark();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    tracing::error!(worker = worker.id, "worker thread exited with a panic");
                }
            }
        }
    }
}

impl Drop for CpuPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CpuPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPool")
            .field("num_threads", &self.num_threads)
            .field("tasks_submitted", &self.tasks_submitted())
            .finish()
    }
}
