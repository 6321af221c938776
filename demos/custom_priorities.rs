//! Custom task priorities example

use std::thread;
use std::time::Duration;
use tierpool::prelude::*;

fn main() -> Result<()> {
    println!("=== Custom Task Priorities Example ===\n");

    let config = Config::builder()
        .workers(1, 1)
        .thread_name_prefix("priorities")
        .build()?;
    let pool = WorkerPool::with_config(config)?;

    // Keep the only worker busy so the rest of the submissions queue up.
    pool.execute(|| thread::sleep(Duration::from_millis(50)));

    println!("Spawning tasks with different priorities...");

    for i in 0..3 {
        pool.schedule("low", move || println!("[LOW] Background task {}", i));
    }
    for i in 0..3 {
        pool.schedule("high", move || println!("[HIGH] Priority task {}", i));
    }
    for i in 0..3 {
        // not a known class, so it queues with Default
        pool.schedule("batch", move || println!("[DEFAULT] Batch task {}", i));
    }
    for i in 0..3 {
        pool.schedule(Priority::Medium, move || println!("[MEDIUM] Regular task {}", i));
    }

    pool.shutdown();
    println!("\nAll tasks completed!");
    println!("\n=== Example Complete ===");
    Ok(())
}
