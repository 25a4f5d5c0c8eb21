use seqflow::prelude::*;
use std::sync::Arc;

fn runtime(threads: usize) -> Arc<Runtime> {
    let config = Config::builder().num_threads(threads).build().unwrap();
    Arc::new(Runtime::new(config).unwrap())
}

#[derive(Debug, Clone, PartialEq)]
struct Student {
    name: &'static str,
    sex: &'static str,
    age: u32,
}

fn students() -> Vec<Student> {
    vec![
        Student { name: "Tom", sex: "M", age: 18 },
        Student { name: "Lily", sex: "F", age: 30 },
        Student { name: "John", sex: "M", age: 29 },
        Student { name: "Lucy", sex: "F", age: 21 },
        Student { name: "Jack", sex: "M", age: 38 },
    ]
}

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: i32,
}

fn persons() -> Vec<Person> {
    [("Max", 18), ("Peter", 23), ("Pamela", 23), ("David", 12)]
        .into_iter()
        .map(|(name, age)| Person { name: name.to_string(), age })
        .collect()
}

fn strings() -> Vec<&'static str> {
    vec!["ddd2", "aaa2", "bbb1", "aaa1", "bbb3", "ccc", "bbb2", "ddd1"]
}

#[test]
fn test_reduce_sequential_and_parallel() {
    let rt = runtime(3);

    assert_eq!(vec![1, 2, 3].into_seq().reduce(0, |a, b| a + b).unwrap(), 6);
    assert_eq!(
        vec![1, 2, 3]
            .into_seq()
            .parallel_in(&rt)
            .reduce_combined(0, |a, b| a + b, |a, b| a + b)
            .unwrap(),
        6
    );
}

#[test]
fn test_reduce_on_global_runtime() {
    let total = (1i64..=1000)
        .into_par_seq()
        .reduce_combined(0i64, |sum, x| sum + x, |a, b| a + b)
        .unwrap();
    assert_eq!(total, 500_500);
}

#[test]
fn test_age_sum_with_combiner() {
    let rt = runtime(2);

    let seq_sum = persons().into_seq().reduce_combined(0, |sum, p| sum + p.age, |a, b| a + b);
    let par_sum = persons()
        .into_seq()
        .parallel_in(&rt)
        .reduce_combined(0, |sum, p| sum + p.age, |a, b| a + b);

    assert_eq!(seq_sum, Ok(76));
    assert_eq!(par_sum, Ok(76));
}

#[test]
fn test_reduce_builds_new_accumulator_each_step() {
    let merged = persons()
        .into_seq()
        .reduce(Person { name: String::new(), age: 0 }, |acc, p| Person {
            name: acc.name + &p.name,
            age: acc.age + p.age,
        })
        .unwrap();

    assert_eq!(merged.name, "MaxPeterPamelaDavid");
    assert_eq!(merged.age, 76);
}

#[test]
fn test_reduce_with_finds_oldest() {
    let rt = runtime(4);

    let oldest = persons()
        .into_seq()
        .parallel_in(&rt)
        .reduce_with(|a, b| if a.age > b.age { a } else { b })
        .unwrap()
        .unwrap();
    assert_eq!(oldest.name, "Pamela");

    let none = Sequence::<Person>::empty().reduce_with(|a, _| a).unwrap();
    assert!(none.is_none());
}

#[test]
fn test_string_matches() {
    let rt = runtime(3);

    assert!(strings().into_seq().any_match(|s| s.starts_with('a')).unwrap());
    assert!(!strings().into_seq().all_match(|s| s.starts_with('a')).unwrap());
    assert!(strings().into_seq().none_match(|s| s.starts_with('z')).unwrap());

    let par = || strings().into_seq().parallel_in(&rt);
    assert!(par().any_match(|s| s.starts_with('a')).unwrap());
    assert!(!par().all_match(|s| s.starts_with('a')).unwrap());
    assert!(par().none_match(|s| s.starts_with('z')).unwrap());
}

#[test]
fn test_empty_sequence_boundaries() {
    let empty = || Sequence::<i32>::empty();

    assert!(!empty().any_match(|_| true).unwrap());
    assert!(empty().all_match(|_| false).unwrap());
    assert!(empty().none_match(|_| true).unwrap());

    let stats = empty().summary_statistics(|x| *x).unwrap();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.average(), None);

    assert_eq!(empty().join_strings(", ", |x| x.to_string()).unwrap(), "");
    assert_eq!(empty().reduce(7, |a, b| a + b).unwrap(), 7);
}

#[test]
fn test_group_by_sex() {
    let rt = runtime(2);
    let pairs = vec![("Tom", "M"), ("Lily", "F"), ("John", "M")];

    for seq in [pairs.clone().into_seq(), pairs.clone().into_seq().parallel_in(&rt)] {
        let groups = seq.group_by(|(_, sex)| *sex).unwrap();
        let names = |key: &str| groups[key].iter().map(|(name, _)| *name).collect::<Vec<_>>();

        assert_eq!(groups.len(), 2);
        assert_eq!(names("M"), vec!["Tom", "John"]);
        assert_eq!(names("F"), vec!["Lily"]);
    }
}

#[test]
fn test_group_students_keeps_order_in_parallel() {
    let rt = runtime(4);
    let groups = students().into_seq().parallel_in(&rt).group_by(|s| s.sex).unwrap();

    let males: Vec<_> = groups["M"].iter().map(|s| s.name).collect();
    let females: Vec<_> = groups["F"].iter().map(|s| s.name).collect();
    assert_eq!(males, vec!["Tom", "John", "Jack"]);
    assert_eq!(females, vec!["Lily", "Lucy"]);
}

#[test]
fn test_oldest_and_youngest_student() {
    let oldest = students().into_seq().max_by_key(|s| s.age).unwrap();
    let youngest = students().into_seq().min_by_key(|s| s.age).unwrap();

    assert_eq!(oldest.map(|s| s.name), Some("Jack"));
    assert_eq!(youngest.map(|s| s.name), Some("Tom"));
}

#[test]
fn test_ties_keep_earliest_element() {
    let rt = runtime(3);
    let data = vec![(1, 'a'), (3, 'b'), (2, 'c'), (3, 'd'), (1, 'e')];

    let seq = || data.clone().into_seq();
    let par = || data.clone().into_seq().parallel_in(&rt);

    assert_eq!(seq().max_by_key(|p| p.0).unwrap(), Some((3, 'b')));
    assert_eq!(par().max_by_key(|p| p.0).unwrap(), Some((3, 'b')));
    assert_eq!(seq().min_by_key(|p| p.0).unwrap(), Some((1, 'a')));
    assert_eq!(par().min_by_key(|p| p.0).unwrap(), Some((1, 'a')));
}

#[test]
fn test_age_total_via_map_and_sum() {
    let total: u32 = students().into_seq().map(|s| s.age).sum().unwrap();
    assert_eq!(total, 136);
}

#[test]
fn test_join_upper_case() {
    let rt = runtime(2);
    let countries = vec!["USA", "Japan", "France"];

    assert_eq!(
        countries.clone().into_seq().join_strings(", ", |s| s.to_uppercase()).unwrap(),
        "USA, JAPAN, FRANCE"
    );
    assert_eq!(
        countries
            .into_seq()
            .parallel_in(&rt)
            .join_strings(", ", |s| s.to_uppercase())
            .unwrap(),
        "USA, JAPAN, FRANCE"
    );
}

#[test]
fn test_prime_statistics() {
    let primes = vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29];
    let stats = primes.into_seq().summary_statistics(|x| *x).unwrap();

    assert_eq!(stats.max(), Some(29));
    assert_eq!(stats.min(), Some(2));
    assert_eq!(stats.sum(), 129i64);
    assert_eq!(stats.average(), Some(12.9));
}

#[test]
fn test_statistics_sum_is_wider_than_elements() {
    let rt = runtime(2);
    let values = vec![i32::MAX, 1];

    for seq in [values.clone().into_seq(), values.into_seq().parallel_in(&rt)] {
        let stats = seq.summary_statistics(|x| *x).unwrap();
        assert_eq!(stats.sum(), 2_147_483_648i64);
        assert_eq!(stats.average(), Some(1_073_741_824.0));
        assert_eq!(stats.max(), Some(i32::MAX));
        assert_eq!(stats.min(), Some(1));
    }
}

#[test]
fn test_parallel_statistics_match_sequential() {
    let rt = runtime(4);
    let values: Vec<f64> = (0..500).map(|i| (i as f64 * 0.37).sin() * 100.0).collect();

    let seq = values.clone().into_seq().summary_statistics(|x| *x).unwrap();
    let par = values.into_seq().parallel_in(&rt).summary_statistics(|x| *x).unwrap();

    assert_eq!(seq.count(), par.count());
    assert_eq!(seq.min(), par.min());
    assert_eq!(seq.max(), par.max());
    assert!((seq.sum() - par.sum()).abs() < 1e-9);
}

#[test]
fn test_distinct_squares() {
    let numbers = vec![9, 10, 3, 4, 7, 3, 4];
    let distinct = numbers.clone().into_seq().map(|i| i * i).distinct().to_vec().unwrap();

    assert_eq!(distinct, vec![81, 100, 9, 16, 49]);
    assert_eq!(numbers, vec![9, 10, 3, 4, 7, 3, 4]);
}

#[test]
fn test_chained_operations_parallel() {
    let rt = runtime(4);

    let result: Vec<i32> = (1i32..100i32)
        .into_seq()
        .parallel_in(&rt)
        .filter(|x| x % 2 == 0)
        .map(|x| x * x)
        .filter(|x| *x < 1000)
        .collect()
        .unwrap();

    let expected: Vec<i32> = (1..100)
        .filter(|x| x % 2 == 0)
        .map(|x| x * x)
        .filter(|x| *x < 1000)
        .collect();
    assert_eq!(result, expected);
}

#[test]
fn test_nested_parallel_pipelines() {
    let rt = runtime(2);
    let inner_rt = rt.clone();

    let result: Vec<Vec<i32>> = (0i32..10i32)
        .into_seq()
        .parallel_in(&rt)
        .map(move |i| {
            (0i32..10i32)
                .into_seq()
                .parallel_in(&inner_rt)
                .map(move |j| i * 10 + j)
                .to_vec()
                .unwrap()
        })
        .collect()
        .unwrap();

    assert_eq!(result.len(), 10);
    assert_eq!(result[5][7], 57);
}

#[test]
fn test_composed_transform() {
    let greet = and_then(|s: String| s + " world", |s: String| s + " and then some");
    let out = vec!["hello".to_string()].into_seq().map(greet).to_vec().unwrap();
    assert_eq!(out, vec!["hello world and then some".to_string()]);
}

#[test]
fn test_count_and_for_each() {
    use std::sync::atomic::{AtomicI64, Ordering};

    let rt = runtime(3);
    let total = Arc::new(AtomicI64::new(0));
    let sink = total.clone();

    (1i64..=100)
        .into_seq()
        .parallel_in(&rt)
        .for_each(move |x| {
            sink.fetch_add(x, Ordering::Relaxed);
        })
        .unwrap();

    assert_eq!(total.load(Ordering::Relaxed), 5050);
    assert_eq!((1i64..=100).into_seq().parallel_in(&rt).filter(|x| x % 10 == 0).count(), Ok(10));
}
