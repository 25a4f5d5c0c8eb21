use super::combinators::{Distinct, Filter, Inspect, Map, TryFilter, TryMap};
use super::partition::{merge_tree, try_fold_part, Partitions};
use super::stats::{StatValue, SummaryStats};
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Elements grouped by classifier key, each group in encounter order.
pub type GroupedResult<K, V> = HashMap<K, Vec<V>>;

/// A lazy, composable chain of sequence transformations.
///
/// Intermediate operations (`map`, `filter`, `distinct`, ...) only build the
/// chain. Terminal operations lower it into [`Partitions`] and evaluate them,
/// on the caller thread for sequential pipelines or on the runtime's pool for
/// parallel ones. Every terminal operation returns the first failure raised by
/// a caller-supplied function and discards partial results.
pub trait Pipeline: Sized {
    type Item: Send + 'static;

    /// Lowers the chain into per-partition iterators without evaluating anything.
    fn partitions(self) -> Result<Partitions<Self::Item>>;

    fn map<F, R>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        Map { base: self, map_fn: f }
    }

    /// Like `map`, but an `Err` from `f` halts evaluation as `Error::TransformFailed`.
    fn try_map<F, R, E>(self, f: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Item) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Send + 'static,
        E: fmt::Display,
    {
        TryMap { base: self, map_fn: f }
    }

    fn filter<F>(self, f: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
    {
        Filter {
            base: self,
            filter_fn: f,
        }
    }

    fn try_filter<F, E>(self, f: F) -> TryFilter<Self, F>
    where
        F: Fn(&Self::Item) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        TryFilter {
            base: self,
            filter_fn: f,
        }
    }

    fn inspect<F>(self, f: F) -> Inspect<Self, F>
    where
        F: Fn(&Self::Item) + Send + Sync + 'static,
    {
        Inspect {
            base: self,
            inspect_fn: f,
        }
    }

    /// Drops repeated elements. Sequential pipelines keep first-seen order;
    /// parallel pipelines evaluate everything upstream before continuing.
    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Distinct { base: self }
    }

    fn collect<C>(self) -> Result<C>
    where
        C: FromIterator<Self::Item>,
    {
        let chunks = self.partitions()?.drive(|part, flag| {
            try_fold_part(part, flag, Vec::new(), |mut items, item| {
                items.push(item);
                Ok(items)
            })
        })?;
        Ok(chunks.into_iter().flatten().collect())
    }

    fn to_vec(self) -> Result<Vec<Self::Item>> {
        self.collect()
    }

    fn count(self) -> Result<usize> {
        let counts = self
            .partitions()?
            .drive(|part, flag| try_fold_part(part, flag, 0usize, |n, _| Ok(n + 1)))?;
        Ok(counts.into_iter().sum())
    }

    fn for_each<F>(self, f: F) -> Result<()>
    where
        F: Fn(Self::Item) + Send + Sync + 'static,
    {
        self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, (), |(), item| {
                f(item);
                Ok(())
            })
        })?;
        Ok(())
    }

    /// Left-to-right fold from `identity`.
    ///
    /// Parallel pipelines still evaluate upstream stages per partition on the
    /// pool; the fold itself runs on the caller thread in sequence order, so
    /// `accumulator` need not be associative.
    fn reduce<A, F>(self, identity: A, mut accumulator: F) -> Result<A>
    where
        F: FnMut(A, Self::Item) -> A,
    {
        let partitions = self.partitions()?;

        if !partitions.is_parallel() {
            let mut acc = identity;
            for part in partitions.parts {
                for item in part {
                    acc = accumulator(acc, item?);
                }
            }
            return Ok(acc);
        }

        let chunks = partitions.drive(|part, flag| {
            try_fold_part(part, flag, Vec::new(), |mut items, item| {
                items.push(item);
                Ok(items)
            })
        })?;
        Ok(chunks.into_iter().flatten().fold(identity, accumulator))
    }

    /// Fold with an explicit combiner for merging partition results.
    ///
    /// Each partition folds from its own clone of `identity`; partial results
    /// are merged pairwise once both sides are complete. `accumulator` and
    /// `combiner` must be associative and `combiner(identity, x) == x`, or the
    /// result depends on partitioning. Sequential pipelines never call `combiner`.
    fn reduce_combined<A, F, C>(self, identity: A, accumulator: F, combiner: C) -> Result<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, Self::Item) -> A + Send + Sync + 'static,
        C: Fn(A, A) -> A,
    {
        let partitions = self.partitions()?;
        let seed = identity.clone();

        let partials = partitions.drive(move |part, flag| {
            try_fold_part(part, flag, identity.clone(), |acc, item| Ok(accumulator(acc, item)))
        })?;

        Ok(merge_tree(partials, combiner).unwrap_or(seed))
    }

    /// Identity-free reduction; `None` for an empty sequence.
    fn reduce_with<F>(self, op: F) -> Result<Option<Self::Item>>
    where
        F: Fn(Self::Item, Self::Item) -> Self::Item + Send + Sync + 'static,
    {
        let op = Arc::new(op);
        let fold_op = op.clone();

        let partials = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, None, |acc, item| {
                Ok(Some(match acc {
                    Some(acc) => fold_op(acc, item),
                    None => item,
                }))
            })
        })?;

        Ok(merge_tree(partials.into_iter().flatten().collect(), |a, b| op(a, b)))
    }

    fn sum<S>(self) -> Result<S>
    where
        S: std::iter::Sum<Self::Item> + std::iter::Sum<S> + Send + 'static,
    {
        let partials = self.partitions()?.drive(|part, flag| {
            let mut failure = None;
            let sum = part
                .map_while(|item| match flag.check().and(item) {
                    Ok(x) => Some(x),
                    Err(e) => {
                        failure = Some(e);
                        None
                    }
                })
                .sum::<S>();
            match failure {
                Some(e) => Err(e),
                None => Ok(sum),
            }
        })?;
        Ok(partials.into_iter().sum())
    }

    /// First element with the greatest key.
    ///
    /// Ties keep the earliest element, unlike `Iterator::max_by_key` which
    /// returns the last one.
    fn max_by_key<K, F>(self, key: F) -> Result<Option<Self::Item>>
    where
        K: Ord,
        F: Fn(&Self::Item) -> K + Send + Sync + 'static,
    {
        let key = Arc::new(key);
        let part_key = key.clone();

        let partials = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, None, |best, item| {
                Ok(Some(match best {
                    Some(best) if part_key(&best) >= part_key(&item) => best,
                    _ => item,
                }))
            })
        })?;

        Ok(partials.into_iter().flatten().reduce(|best, item| {
            if key(&best) >= key(&item) {
                best
            } else {
                item
            }
        }))
    }

    /// First element with the smallest key, matching `Iterator::min_by_key`.
    fn min_by_key<K, F>(self, key: F) -> Result<Option<Self::Item>>
    where
        K: Ord,
        F: Fn(&Self::Item) -> K + Send + Sync + 'static,
    {
        let key = Arc::new(key);
        let part_key = key.clone();

        let partials = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, None, |best, item| {
                Ok(Some(match best {
                    Some(best) if part_key(&best) <= part_key(&item) => best,
                    _ => item,
                }))
            })
        })?;

        Ok(partials.into_iter().flatten().reduce(|best, item| {
            if key(&best) <= key(&item) {
                best
            } else {
                item
            }
        }))
    }

    /// Groups elements by `classifier`; each group keeps sequence order.
    fn group_by<K, F>(self, classifier: F) -> Result<GroupedResult<K, Self::Item>>
    where
        K: Eq + Hash + Send + 'static,
        F: Fn(&Self::Item) -> K + Send + Sync + 'static,
    {
        let partials = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, GroupedResult::new(), |mut groups, item| {
                groups.entry(classifier(&item)).or_insert_with(Vec::new).push(item);
                Ok(groups)
            })
        })?;

        let mut grouped = GroupedResult::new();
        for partial in partials {
            for (key, items) in partial {
                grouped.entry(key).or_insert_with(Vec::new).extend(items);
            }
        }
        Ok(grouped)
    }

    fn summary_statistics<N, F>(self, projection: F) -> Result<SummaryStats<N>>
    where
        N: StatValue,
        F: Fn(&Self::Item) -> N + Send + Sync + 'static,
    {
        let partials = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, SummaryStats::new(), |mut stats, item| {
                stats.accept(projection(&item));
                Ok(stats)
            })
        })?;

        Ok(partials.into_iter().fold(SummaryStats::new(), SummaryStats::combine))
    }

    /// True as soon as one element satisfies `predicate`; false when empty.
    ///
    /// Partitions of a parallel pipeline stop pulling elements once any of
    /// them has found a match.
    fn any_match<F>(self, predicate: F) -> Result<bool>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
    {
        let found = Arc::new(AtomicBool::new(false));
        let decided = found.clone();

        let hits = self.partitions()?.drive(move |part, flag| {
            for item in part {
                if decided.load(Ordering::Acquire) {
                    return Ok(false);
                }
                flag.check()?;
                if predicate(&item?) {
                    decided.store(true, Ordering::Release);
                    return Ok(true);
                }
            }
            Ok(false)
        })?;

        Ok(found.load(Ordering::Acquire) || hits.into_iter().any(|hit| hit))
    }

    /// False at the first counterexample; true when empty.
    fn all_match<F>(self, predicate: F) -> Result<bool>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
    {
        self.any_match(move |item| !predicate(item)).map(|found| !found)
    }

    /// False at the first element satisfying `predicate`; true when empty.
    fn none_match<F>(self, predicate: F) -> Result<bool>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
    {
        self.any_match(predicate).map(|found| !found)
    }

    /// Transformed elements in sequence order, `separator` between neighbours.
    fn join_strings<F, S>(self, separator: &str, transform: F) -> Result<String>
    where
        F: Fn(Self::Item) -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        let chunks = self.partitions()?.drive(move |part, flag| {
            try_fold_part(part, flag, Vec::new(), |mut pieces, item| {
                let piece: String = transform(item).into();
                pieces.push(piece);
                Ok(pieces)
            })
        })?;

        Ok(chunks.into_iter().flatten().collect::<Vec<String>>().join(separator))
    }
}
