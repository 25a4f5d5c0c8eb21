//! Failure propagation from caller-supplied functions.

use seqflow::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn runtime(threads: usize) -> Arc<Runtime> {
    let config = Config::builder()
        .num_threads(threads)
        .panic_strategy(PanicStrategy::Isolate)
        .build()
        .unwrap();
    Arc::new(Runtime::new(config).unwrap())
}

#[test]
fn test_try_map_failure_sequential() {
    let result = vec!["4", "8", "fifteen", "16"]
        .into_seq()
        .try_map(|s| s.parse::<i32>())
        .reduce(0, |a, b| a + b);

    match result {
        Err(Error::TransformFailed(msg)) => assert!(msg.contains("invalid digit")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_try_map_failure_parallel() {
    let rt = runtime(4);

    let result = (0i32..1000)
        .into_seq()
        .parallel_in(&rt)
        .try_map(|x| if x == 777 { Err(format!("rejected {}", x)) } else { Ok(x) })
        .reduce_combined(0i64, |acc, x| acc + x as i64, |a, b| a + b);

    assert_eq!(result, Err(Error::TransformFailed("rejected 777".into())));
}

#[test]
fn test_sequential_failure_stops_immediately() {
    let evaluated = Arc::new(AtomicUsize::new(0));
    let counter = evaluated.clone();

    let result = (0i32..100)
        .into_seq()
        .try_map(move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            if x == 10 {
                Err("stop")
            } else {
                Ok(x)
            }
        })
        .count();

    assert!(result.is_err());
    assert_eq!(evaluated.load(Ordering::SeqCst), 11);
}

#[test]
fn test_panic_in_parallel_worker_surfaces_as_error() {
    let rt = runtime(3);

    let result = (0i32..300)
        .into_seq()
        .parallel_in(&rt)
        .map(|x| {
            if x == 150 {
                panic!("cannot handle {}", x);
            }
            x
        })
        .to_vec();

    assert_eq!(result, Err(Error::WorkerPanic("cannot handle 150".into())));
    assert_eq!(rt.panic_count(), 1);

    // The pool survives a panicking partition.
    let sum: i32 = (0i32..10).into_seq().parallel_in(&rt).sum().unwrap();
    assert_eq!(sum, 45);
}

#[test]
fn test_failure_in_match_predicate() {
    let rt = runtime(2);

    let result = vec!["1", "2", "x"]
        .into_seq()
        .parallel_in(&rt)
        .try_filter(|s| s.parse::<i32>().map(|n| n > 0))
        .any_match(|s| s.is_empty());

    assert!(matches!(result, Err(Error::TransformFailed(_))));
}

#[test]
fn test_failure_discards_partial_groups() {
    let rt = runtime(4);

    let result = (0i32..64)
        .into_seq()
        .parallel_in(&rt)
        .try_map(|x| if x % 50 == 49 { Err("bad") } else { Ok(x) })
        .group_by(|x| x % 3);

    assert_eq!(result, Err(Error::TransformFailed("bad".into())));
}

fn counting<F>(predicate: F) -> (Arc<AtomicUsize>, impl Fn(&&str) -> bool + Send + Sync + 'static)
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let counted = move |s: &&str| {
        counter.fetch_add(1, Ordering::SeqCst);
        predicate(s)
    };
    (calls, counted)
}

#[test]
fn test_sequential_matches_stop_at_deciding_element() {
    let strings = || vec!["ddd2", "aaa2", "bbb1", "aaa1", "bbb3", "ccc", "bbb2", "ddd1"].into_seq();

    let (calls, predicate) = counting(|s| s.starts_with('a'));
    assert!(!strings().all_match(predicate).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (calls, predicate) = counting(|s| s.starts_with('a'));
    assert!(strings().any_match(predicate).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let (calls, predicate) = counting(|s| s.starts_with('b'));
    assert!(!strings().none_match(predicate).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let (calls, predicate) = counting(|s| s.is_empty());
    assert!(!strings().any_match(predicate).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

#[test]
fn test_parallel_any_match_stops_early() {
    let rt = runtime(2);
    let evaluated = Arc::new(AtomicUsize::new(0));
    let counter = evaluated.clone();

    let found = (0i32..10_000)
        .into_seq()
        .parallel_in(&rt)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .any_match(|x| *x == 0)
        .unwrap();

    assert!(found);
    assert!(evaluated.load(Ordering::Relaxed) < 10_000);
}

#[test]
fn test_sequential_combiner_never_called() {
    let combines = Arc::new(AtomicUsize::new(0));
    let counter = combines.clone();

    let total = (1i32..=10)
        .into_seq()
        .reduce_combined(0, |a, b| a + b, move |a, b| {
            counter.fetch_add(1, Ordering::SeqCst);
            a + b
        })
        .unwrap();

    assert_eq!(total, 55);
    assert_eq!(combines.load(Ordering::SeqCst), 0);
}

#[test]
fn test_parallel_combiner_merges_every_partition() {
    let config = Config::builder().num_threads(2).partitions_per_thread(2).build().unwrap();
    let rt = Arc::new(Runtime::new(config).unwrap());
    let combines = Arc::new(AtomicUsize::new(0));
    let counter = combines.clone();

    let total = (1i32..=100)
        .into_seq()
        .parallel_in(&rt)
        .reduce_combined(0, |a, b| a + b, move |a, b| {
            counter.fetch_add(1, Ordering::SeqCst);
            a + b
        })
        .unwrap();

    assert_eq!(total, 5050);
    // four partitions need three pairwise merges
    assert_eq!(combines.load(Ordering::SeqCst), 3);
}
