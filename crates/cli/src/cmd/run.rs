//! Real-time run on the shared timer thread

use crate::util::{describe, format_offset};
use crate::EdgeArgs;
use anyhow::{anyhow, Result};
use debounce::Debouncer;
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Run the run command
pub fn run(edges: &EdgeArgs, threads: usize, duration: u64, settle: u64) -> Result<()> {
    let (wait, options) = edges.resolve()?;
    let threads = threads.max(1);
    let duration = Duration::from_millis(duration);

    info!(
        settings = %describe(wait, &options),
        threads,
        "Calling in real time for {}",
        format_offset(duration)
    );

    let start = Instant::now();
    let invocations: Arc<Mutex<Vec<(Duration, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&invocations);
    let debouncer = Debouncer::new(
        move |worker: usize| {
            let at = start.elapsed();
            debug!(worker, at = ?at, "Invoked");
            sink.lock().push((at, worker));
        },
        wait,
        options,
    );

    let mut calls = 0u64;
    let workers: Vec<_> = (0..threads)
        .map(|worker| {
            let debouncer = debouncer.clone();
            thread::spawn(move || {
                let mut made = 0u64;
                while start.elapsed() < duration {
                    debouncer.call(worker);
                    made += 1;
                }
                made
            })
        })
        .collect();

    for worker in workers {
        calls += worker
            .join()
            .map_err(|_| anyhow!("Calling thread panicked"))?;
    }

    thread::sleep(Duration::from_millis(settle));
    let pending = debouncer.pending();
    debouncer.cancel();

    let invocations = invocations.lock();
    println!(
        "{} {} calls from {} threads, {} invocations",
        "Run".bold(),
        calls,
        threads,
        invocations.len().to_string().green()
    );
    for (at, worker) in invocations.iter() {
        println!("  {}  thread {}", format_offset(*at).cyan(), worker);
    }
    if pending {
        println!("{} an invocation was still pending and has been cancelled", "!".yellow());
    }

    Ok(())
}
