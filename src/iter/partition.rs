//! Partition planning and the driver that evaluates partitions.
//!
//! A pipeline is lowered into one lazy iterator per partition. Sequential
//! pipelines always have a single partition evaluated on the caller thread.
//! Parallel pipelines split the source into contiguous chunks and run one
//! pool task per chunk.

use crate::error::{Error, Result};
use crate::executor::current_worker;
use crate::runtime::Runtime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lazily evaluated elements of one partition. Failures travel in-band.
pub type Part<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

/// Where the partitions of a lowered pipeline run.
#[derive(Debug, Clone)]
pub enum Execution {
    Sequential,
    Parallel(Arc<Runtime>),
}

/// Shared by every partition of one evaluation; raised on the first failure.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

pub struct Partitions<T> {
    pub(crate) execution: Execution,
    pub(crate) parts: Vec<Part<T>>,
}

impl<T> std::fmt::Debug for Partitions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitions")
            .field("execution", &self.execution)
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl<T: Send + 'static> Partitions<T> {
    pub(crate) fn single(items: Vec<T>) -> Self {
        Self {
            execution: Execution::Sequential,
            parts: vec![Box::new(items.into_iter().map(Ok))],
        }
    }

    /// Splits `items` into contiguous chunks sized for the execution's runtime.
    pub(crate) fn split(items: Vec<T>, execution: Execution) -> Self {
        let rt = match &execution {
            Execution::Sequential => return Self::single(items),
            Execution::Parallel(rt) => rt,
        };

        let count = rt.config().partition_count(items.len());
        let parts = split_contiguous(items, count)
            .into_iter()
            .map(|chunk| Box::new(chunk.into_iter().map(Ok)) as Part<T>)
            .collect();

        Self { execution, parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.execution, Execution::Parallel(_))
    }

    pub(crate) fn map_parts<U, F>(self, mut f: F) -> Partitions<U>
    where
        F: FnMut(Part<T>) -> Part<U>,
    {
        Partitions {
            execution: self.execution,
            parts: self.parts.into_iter().map(|p| f(p)).collect(),
        }
    }

    /// Evaluates every partition with `per_part`, returning results in partition order.
    ///
    /// In parallel mode each partition is one pool task. The first failure raises
    /// the cancel flag; the error is returned only after every submitted task has
    /// reported back. Called from inside a pool worker, partitions run inline so
    /// nested evaluations cannot starve the pool.
    pub(crate) fn drive<R, F>(self, per_part: F) -> Result<Vec<R>>
    where
        R: Send + 'static,
        F: Fn(Part<T>, &CancelFlag) -> Result<R> + Send + Sync + 'static,
    {
        let flag = CancelFlag::new();
        let Partitions { execution, parts } = self;

        let rt = match execution {
            Execution::Parallel(rt) if parts.len() > 1 => rt,
            _ => return drive_inline(parts, &per_part, &flag),
        };

        if let Some(worker) = current_worker() {
            tracing::debug!(worker, partitions = parts.len(), "nested evaluation runs inline");
            return drive_inline(parts, &per_part, &flag);
        }

        let total = parts.len();
        tracing::debug!(
            partitions = total,
            threads = rt.num_threads(),
            "evaluating partitions in parallel"
        );

        let per_part = Arc::new(per_part);
        let (tx, rx) = crossbeam_channel::unbounded();

        for (index, part) in parts.into_iter().enumerate() {
            let per_part = per_part.clone();
            let handler = rt.panic_handler.clone();
            let flag = flag.clone();
            let tx = tx.clone();

            rt.pool.execute(move || {
                let outcome = match flag.check() {
                    Err(cancelled) => Err(cancelled),
                    Ok(()) => handler
                        .execute(|| per_part(part, &flag))
                        .unwrap_or_else(|report| Err(report.into())),
                };
                if outcome.is_err() {
                    flag.cancel();
                }
                // Caller closures may own runtime handles; release them before reporting.
                drop(per_part);
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
        let mut failure: Option<Error> = None;

        for _ in 0..total {
            match rx.recv() {
                Ok((index, Ok(value))) => slots[index] = Some(value),
                Ok((index, Err(err))) => {
                    let replace = match &failure {
                        None => true,
                        Some(current) => current.is_cancelled() && !err.is_cancelled(),
                    };
                    if replace {
                        tracing::debug!(partition = index, error = %err, "partition failed");
                        failure = Some(err);
                    }
                }
                Err(_) => {
                    return Err(Error::executor(
                        "worker pool dropped a partition before it reported",
                    ));
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        slots
            .into_iter()
            .map(|slot| slot.ok_or_else(|| Error::executor("partition result missing")))
            .collect()
    }
}

fn drive_inline<T, R, F>(parts: Vec<Part<T>>, per_part: &F, flag: &CancelFlag) -> Result<Vec<R>>
where
    F: Fn(Part<T>, &CancelFlag) -> Result<R>,
{
    parts.into_iter().map(|part| per_part(part, flag)).collect()
}

/// Left fold over one partition, stopping at the first failure or cancellation.
pub(crate) fn try_fold_part<T, A, F>(
    part: Part<T>,
    flag: &CancelFlag,
    init: A,
    mut f: F,
) -> Result<A>
where
    F: FnMut(A, T) -> Result<A>,
{
    let mut acc = init;
    for item in part {
        flag.check()?;
        acc = f(acc, item?)?;
    }
    Ok(acc)
}

pub(crate) fn collect_part<T>(part: Part<T>, flag: &CancelFlag) -> Result<Vec<T>> {
    try_fold_part(part, flag, Vec::new(), |mut items, item| {
        items.push(item);
        Ok(items)
    })
}

/// Merges adjacent pairs until one value remains; `None` for no values.
pub(crate) fn merge_tree<A, F>(mut values: Vec<A>, combiner: F) -> Option<A>
where
    F: Fn(A, A) -> A,
{
    while values.len() > 1 {
        let mut next = Vec::with_capacity((values.len() + 1) / 2);
        let mut iter = values.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(combiner(left, right)),
                None => next.push(left),
            }
        }
        values = next;
    }
    values.pop()
}

/// Splits into `count` contiguous chunks whose lengths differ by at most one.
pub(crate) fn split_contiguous<T>(items: Vec<T>, count: usize) -> Vec<Vec<T>> {
    let count = count.max(1);
    let base = items.len() / count;
    let extra = items.len() % count;

    let mut iter = items.into_iter();
    (0..count)
        .map(|i| {
            let size = base + usize::from(i < extra);
            iter.by_ref().take(size).collect()
        })
        .collect()
}
