//! A burst of default work overtaken by high-priority work.
//!
//! Run with `RUST_LOG=tierpool=debug` to watch the pool grow and drain.

use rand::Rng;
use std::thread;
use std::time::Duration;
use tierpool::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Priority Burst Example ===\n");

    let pool = WorkerPool::new(2, 3)?;

    for i in 0..10 {
        pool.schedule(Priority::Default, move || {
            let ms = rand::thread_rng().gen_range(100..300);
            thread::sleep(Duration::from_millis(ms));
            println!("default task {} done", i);
        });
    }

    for i in 0..5 {
        pool.schedule(Priority::High, move || {
            let ms = rand::thread_rng().gen_range(100..200);
            thread::sleep(Duration::from_millis(ms));
            println!("HIGH PRIORITY task {} done", i);
        });
    }

    println!("{:?}\n", pool.stats());

    pool.shutdown();

    let stats = pool.stats();
    println!("\nworkers used: {} of {}", stats.worker_count, stats.max_workers);
    println!("\n=== Example Complete ===");
    Ok(())
}
