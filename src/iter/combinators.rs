//! Lazy intermediate stages.
//!
//! Each stage lowers its base into partitions and wraps every partition's
//! iterator. Nothing runs until a terminal operation drives the partitions.

use super::partition::{collect_part, Execution, Part, Partitions};
use super::seq_iter::Pipeline;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

pub struct Map<P, F> {
    pub(crate) base: P,
    pub(crate) map_fn: F,
}

pub struct TryMap<P, F> {
    pub(crate) base: P,
    pub(crate) map_fn: F,
}

pub struct Filter<P, F> {
    pub(crate) base: P,
    pub(crate) filter_fn: F,
}

pub struct TryFilter<P, F> {
    pub(crate) base: P,
    pub(crate) filter_fn: F,
}

pub struct Inspect<P, F> {
    pub(crate) base: P,
    pub(crate) inspect_fn: F,
}

pub struct Distinct<P> {
    pub(crate) base: P,
}

impl<P, F, R> Pipeline for Map<P, F>
where
    P: Pipeline,
    F: Fn(P::Item) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    type Item = R;

    fn partitions(self) -> Result<Partitions<R>> {
        let map_fn = Arc::new(self.map_fn);
        Ok(self.base.partitions()?.map_parts(|part| {
            let map_fn = map_fn.clone();
            Box::new(part.map(move |item| item.map(|x| map_fn(x)))) as Part<R>
        }))
    }
}

impl<P, F, R, E> Pipeline for TryMap<P, F>
where
    P: Pipeline,
    F: Fn(P::Item) -> std::result::Result<R, E> + Send + Sync + 'static,
    R: Send + 'static,
    E: fmt::Display,
{
    type Item = R;

    fn partitions(self) -> Result<Partitions<R>> {
        let map_fn = Arc::new(self.map_fn);
        Ok(self.base.partitions()?.map_parts(|part| {
            let map_fn = map_fn.clone();
            Box::new(part.map(move |item| {
                item.and_then(|x| map_fn(x).map_err(Error::transform))
            })) as Part<R>
        }))
    }
}

impl<P, F> Pipeline for Filter<P, F>
where
    P: Pipeline,
    F: Fn(&P::Item) -> bool + Send + Sync + 'static,
{
    type Item = P::Item;

    fn partitions(self) -> Result<Partitions<P::Item>> {
        let filter_fn = Arc::new(self.filter_fn);
        Ok(self.base.partitions()?.map_parts(|part| {
            let filter_fn = filter_fn.clone();
            Box::new(part.filter(move |item| match item {
                Ok(x) => filter_fn(x),
                Err(_) => true,
            })) as Part<P::Item>
        }))
    }
}

impl<P, F, E> Pipeline for TryFilter<P, F>
where
    P: Pipeline,
    F: Fn(&P::Item) -> std::result::Result<bool, E> + Send + Sync + 'static,
    E: fmt::Display,
{
    type Item = P::Item;

    fn partitions(self) -> Result<Partitions<P::Item>> {
        let filter_fn = Arc::new(self.filter_fn);
        Ok(self.base.partitions()?.map_parts(|part| {
            let filter_fn = filter_fn.clone();
            Box::new(part.filter_map(move |item| match item {
                Ok(x) => match filter_fn(&x) {
                    Ok(true) => Some(Ok(x)),
                    Ok(false) => None,
                    Err(e) => Some(Err(Error::transform(e))),
                },
                Err(e) => Some(Err(e)),
            })) as Part<P::Item>
        }))
    }
}

impl<P, F> Pipeline for Inspect<P, F>
where
    P: Pipeline,
    F: Fn(&P::Item) + Send + Sync + 'static,
{
    type Item = P::Item;

    fn partitions(self) -> Result<Partitions<P::Item>> {
        let inspect_fn = Arc::new(self.inspect_fn);
        Ok(self.base.partitions()?.map_parts(|part| {
            let inspect_fn = inspect_fn.clone();
            Box::new(part.map(move |item| {
                if let Ok(x) = &item {
                    inspect_fn(x);
                }
                item
            })) as Part<P::Item>
        }))
    }
}

impl<P> Pipeline for Distinct<P>
where
    P: Pipeline,
    P::Item: Eq + Hash + Clone,
{
    type Item = P::Item;

    fn partitions(self) -> Result<Partitions<P::Item>> {
        let upstream = self.base.partitions()?;

        match upstream.execution.clone() {
            Execution::Sequential => {
                let merged: Part<P::Item> = Box::new(upstream.parts.into_iter().flatten());
                Ok(Partitions {
                    execution: Execution::Sequential,
                    parts: vec![dedup_part(merged)],
                })
            }
            // Barrier: evaluate upstream, keep first occurrences, re-split.
            execution @ Execution::Parallel(_) => {
                let chunks = upstream.drive(|part, flag| collect_part(part, flag))?;
                let mut seen = HashSet::new();
                let unique: Vec<P::Item> = chunks
                    .into_iter()
                    .flatten()
                    .filter(|x| seen.insert(x.clone()))
                    .collect();
                Ok(Partitions::split(unique, execution))
            }
        }
    }
}

fn dedup_part<T>(part: Part<T>) -> Part<T>
where
    T: Eq + Hash + Clone + Send + 'static,
{
    let mut seen = HashSet::new();
    Box::new(part.filter(move |item| match item {
        Ok(x) => seen.insert(x.clone()),
        Err(_) => true,
    }))
}
