//! Virtual-time replay of a call burst

use crate::util::{describe, format_offset, print_settings};
use crate::EdgeArgs;
use anyhow::Result;
use debounce::{Debouncer, ManualTimer, Options};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One invocation of the debounced function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Virtual milliseconds since the first call
    pub at_ms: u64,
    /// Index of the call whose arguments were used
    pub call: u64,
}

/// Outcome of a simulation, as printed by `--json`
#[derive(Debug, Serialize)]
pub struct Report {
    pub wait_ms: u64,
    pub leading: bool,
    pub trailing: bool,
    pub max_wait_ms: Option<u64>,
    pub calls: u64,
    pub invocations: Vec<Invocation>,
    pub pending: bool,
}

/// Parameters of the call stream
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub length: Duration,
    pub interval: Duration,
    pub jitter: Duration,
    pub settle: Duration,
    pub seed: u64,
}

/// Run the simulate command
pub fn run(
    edges: &EdgeArgs,
    burst: u64,
    interval: u64,
    jitter: u64,
    settle: u64,
    seed: u64,
    json: bool,
) -> Result<()> {
    let (wait, options) = edges.resolve()?;
    let burst = Burst {
        length: Duration::from_millis(burst),
        interval: Duration::from_millis(interval),
        jitter: Duration::from_millis(jitter),
        settle: Duration::from_millis(settle),
        seed,
    };

    info!(settings = %describe(wait, &options), "Simulating on virtual time");
    let report = simulate(wait, options, burst);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(wait, &options, &report);
    }

    Ok(())
}

/// Drive a debouncer on a manual timer and record every invocation
pub fn simulate(wait: Duration, options: Options, burst: Burst) -> Report {
    let timer = Arc::new(ManualTimer::new());
    let invocations = Arc::new(Mutex::new(Vec::new()));

    let clock = Arc::clone(timer.clock());
    let sink = Arc::clone(&invocations);
    let debouncer = Debouncer::with_services(
        move |call: u64| {
            let at_ms = clock.elapsed().as_millis() as u64;
            debug!(at_ms, call, "Invoked");
            sink.lock().push(Invocation { at_ms, call });
        },
        wait,
        options,
        timer.clone(),
        timer.clone(),
    );

    let mut rng = ChaCha8Rng::seed_from_u64(burst.seed);
    let jitter_ms = burst.jitter.as_millis() as u64;
    let mut calls = 0;

    while timer.elapsed() < burst.length {
        debouncer.call(calls);
        calls += 1;

        let extra = if jitter_ms > 0 { rng.gen_range(0..=jitter_ms) } else { 0 };
        let step = (burst.interval + Duration::from_millis(extra)).max(Duration::from_millis(1));
        timer.advance(step);
    }
    timer.advance(burst.settle);

    let pending = debouncer.pending();
    let invocations = invocations.lock().clone();

    Report {
        wait_ms: wait.as_millis() as u64,
        leading: options.leading,
        trailing: options.trailing,
        max_wait_ms: options.max_wait.map(|max| max.as_millis() as u64),
        calls,
        invocations,
        pending,
    }
}

fn print_report(wait: Duration, options: &Options, report: &Report) {
    println!("{}", "Settings".bold());
    print_settings(wait, options);
    println!();

    println!(
        "{} {} calls, {} invocations",
        "Timeline".bold(),
        report.calls,
        report.invocations.len().to_string().green()
    );
    if report.invocations.is_empty() {
        println!("  {}", "(no invocations)".dimmed());
    }
    for invocation in &report.invocations {
        println!(
            "  {}  call #{}",
            format_offset(Duration::from_millis(invocation.at_ms)).cyan(),
            invocation.call
        );
    }

    if report.pending {
        println!();
        println!("{} a trailing invocation is still pending", "!".yellow());
    }
}
