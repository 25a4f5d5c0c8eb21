//! Pipeline sources and execution mode selection.

use super::combinators::Map;
use super::partition::{Execution, Partitions};
use super::seq_iter::Pipeline;
use crate::error::Result;
use crate::runtime::{self, Runtime};
use std::sync::Arc;

/// How a source's partitions are evaluated.
#[derive(Debug, Clone, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// On the global runtime, started lazily if needed.
    Parallel,
    ParallelIn(Arc<Runtime>),
}

/// An owned, finite source of elements. The start of every pipeline.
#[derive(Debug, Clone)]
pub struct Sequence<T> {
    items: Vec<T>,
    mode: ExecutionMode,
}

impl<T: Send + 'static> Sequence<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            mode: ExecutionMode::Sequential,
        }
    }

    /// Clones the elements; the slice itself is never touched again.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_vec(items.to_vec())
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn sequential(mut self) -> Self {
        self.mode = ExecutionMode::Sequential;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.mode = ExecutionMode::Parallel;
        self
    }

    pub fn parallel_in(mut self, runtime: &Arc<Runtime>) -> Self {
        self.mode = ExecutionMode::ParallelIn(runtime.clone());
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }

    pub fn is_parallel(&self) -> bool {
        !matches!(self.mode, ExecutionMode::Sequential)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Sequence<usize> {
    /// `f(0), f(1), .., f(n - 1)`, produced lazily at terminal time.
    pub fn generate<F, R>(n: usize, f: F) -> Map<Self, F>
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        Sequence::from_vec((0..n).collect()).map(f)
    }
}

impl<T: Send + 'static> Pipeline for Sequence<T> {
    type Item = T;

    fn partitions(self) -> Result<Partitions<T>> {
        let execution = match self.mode {
            ExecutionMode::Sequential => return Ok(Partitions::single(self.items)),
            ExecutionMode::Parallel => Execution::Parallel(runtime::global()?),
            ExecutionMode::ParallelIn(rt) => Execution::Parallel(rt),
        };
        Ok(Partitions::split(self.items, execution))
    }
}

impl<T: Send + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Send + 'static> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

pub trait IntoSequence {
    type Item: Send + 'static;

    fn into_seq(self) -> Sequence<Self::Item>;

    fn into_par_seq(self) -> Sequence<Self::Item>
    where
        Self: Sized,
    {
        self.into_seq().parallel()
    }
}

impl<T: Send + 'static> IntoSequence for Vec<T> {
    type Item = T;

    fn into_seq(self) -> Sequence<T> {
        Sequence::from_vec(self)
    }
}

impl<T: Send + 'static, const N: usize> IntoSequence for [T; N] {
    type Item = T;

    fn into_seq(self) -> Sequence<T> {
        Sequence::from_vec(Vec::from(self))
    }
}

macro_rules! impl_into_sequence_for_ranges {
    ($($t:ty),*) => {
        $(
            impl IntoSequence for std::ops::Range<$t> {
                type Item = $t;

                fn into_seq(self) -> Sequence<$t> {
                    self.collect()
                }
            }

            impl IntoSequence for std::ops::RangeInclusive<$t> {
                type Item = $t;

                fn into_seq(self) -> Sequence<$t> {
                    self.collect()
                }
            }
        )*
    };
}

impl_into_sequence_for_ranges!(i32, i64, u32, u64, usize);
