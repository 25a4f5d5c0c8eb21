//! Sequential pipeline walkthrough: stages, matching, grouping and statistics.
//!
//! Run with `RUST_LOG=seqflow=debug cargo run --example stream_basics` to see
//! partition planning in the log output.

use seqflow::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Student {
    name: &'static str,
    sex: &'static str,
    age: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let strings = vec!["ddd2", "aaa2", "bbb1", "aaa1", "bbb3", "ccc", "bbb2", "ddd1"];

    let any_a = strings.clone().into_seq().any_match(|s| s.starts_with('a'))?;
    let all_a = strings.clone().into_seq().all_match(|s| s.starts_with('a'))?;
    let none_z = strings.clone().into_seq().none_match(|s| s.starts_with('z'))?;
    println!("any starts with a: {}", any_a);
    println!("all start with a: {}", all_a);
    println!("none start with z: {}", none_z);

    let b_count = strings.into_seq().filter(|s| s.starts_with('b')).count()?;
    println!("strings starting with b: {}", b_count);

    let squares = vec![9, 10, 3, 4, 7, 3, 4]
        .into_seq()
        .map(|i| i * i)
        .distinct()
        .to_vec()?;
    println!("distinct squares: {:?}", squares);

    let countries = vec!["USA", "Japan", "France", "Germany", "Italy", "U.K.", "Canada"];
    let joined = countries.into_seq().join_strings(", ", |s| s.to_uppercase())?;
    println!("countries: {}", joined);

    let students = vec![
        Student { name: "Tom", sex: "M", age: 18 },
        Student { name: "Lily", sex: "F", age: 30 },
        Student { name: "John", sex: "M", age: 29 },
        Student { name: "Lucy", sex: "F", age: 21 },
        Student { name: "Jack", sex: "M", age: 38 },
    ];

    let groups = students.clone().into_seq().group_by(|s| s.sex)?;
    let mut keys: Vec<_> = groups.keys().copied().collect();
    keys.sort_unstable();
    for key in keys {
        let names: Vec<_> = groups[key].iter().map(|s| s.name).collect();
        println!("{}: {:?}", key, names);
    }

    if let Some(oldest) = students.clone().into_seq().max_by_key(|s| s.age)? {
        println!("oldest: {} ({})", oldest.name, oldest.age);
    }
    let total_age: u32 = students.into_seq().map(|s| s.age).sum()?;
    println!("total age: {}", total_age);

    let primes = vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29];
    let stats = primes.into_seq().summary_statistics(|x| *x)?;
    println!("{}", stats);

    let shout = compose(|s: String| s.to_uppercase(), |s: &str| format!("{}!", s));
    println!("{}", shout("hello"));

    Ok(())
}
