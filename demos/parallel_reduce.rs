//! Parallel reductions with combiners on an explicitly configured runtime.

use seqflow::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Person {
    name: String,
    age: i32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_thread_names(true)
        .init();

    let config = Config::builder().num_threads(4).build()?;
    let rt = Arc::new(Runtime::new(config)?);
    tracing::info!(threads = rt.num_threads(), "runtime started");

    let persons: Vec<Person> = [("Max", 18), ("Peter", 23), ("Pamela", 23), ("David", 12)]
        .into_iter()
        .map(|(name, age)| Person { name: name.to_string(), age })
        .collect();

    let age_sum = persons
        .clone()
        .into_seq()
        .parallel_in(&rt)
        .reduce_combined(0, |sum, p| sum + p.age, |a, b| a + b)?;
    println!("age sum: {}", age_sum);

    let oldest = persons
        .clone()
        .into_seq()
        .parallel_in(&rt)
        .reduce_with(|a, b| if a.age > b.age { a } else { b })?;
    if let Some(p) = oldest {
        println!("oldest: {} ({})", p.name, p.age);
    }

    let merged = persons.into_seq().reduce(
        Person { name: String::new(), age: 0 },
        |acc, p| Person { name: acc.name + &p.name, age: acc.age + p.age },
    )?;
    println!("merged: {} {}", merged.name, merged.age);

    let total = (1i64..=1_000_000)
        .into_seq()
        .parallel_in(&rt)
        .filter(|x| x % 3 == 0)
        .reduce_combined(0i64, |acc, x| acc + x, |a, b| a + b)?;
    println!("sum of multiples of three: {}", total);

    let stats = (0i64..100_000)
        .into_seq()
        .parallel_in(&rt)
        .summary_statistics(|x| x % 1000)?;
    println!("{}", stats);

    let failed = vec!["1", "2", "three"]
        .into_seq()
        .parallel_in(&rt)
        .try_map(|s| s.parse::<i32>())
        .sum::<i32>();
    match failed {
        Ok(sum) => println!("parsed sum: {}", sum),
        Err(err) => println!("pipeline failed: {}", err),
    }

    Ok(())
}
