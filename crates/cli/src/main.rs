//! dbn - debounce and throttle playground

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod cmd;
mod util;

/// Explore debounce and throttle behavior on virtual or real time
#[derive(Parser)]
#[command(name = "dbn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a burst of calls on virtual time and print the invocations
    Simulate {
        #[command(flatten)]
        edges: EdgeArgs,
        /// How long calls keep arriving, in ms
        #[arg(long, default_value = "1200")]
        burst: u64,
        /// Gap between calls, in ms
        #[arg(long, default_value = "1")]
        interval: u64,
        /// Extra random gap of up to this many ms per call
        #[arg(long, default_value = "0")]
        jitter: u64,
        /// Quiet time after the burst, in ms
        #[arg(long, default_value = "500")]
        settle: u64,
        /// Seed for the jitter generator
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hammer a debounced function from several threads in real time
    Run {
        #[command(flatten)]
        edges: EdgeArgs,
        /// Number of calling threads
        #[arg(long, default_value = "1")]
        threads: usize,
        /// How long the threads keep calling, in ms
        #[arg(long, default_value = "1200")]
        duration: u64,
        /// Quiet time after the burst, in ms
        #[arg(long, default_value = "500")]
        settle: u64,
    },
    /// Validate a config file and show the effective settings
    Check {
        /// Path to a TOML config file
        config: PathBuf,
    },
}

/// Debounce settings shared by `simulate` and `run`
#[derive(Args, Debug, Clone)]
pub struct EdgeArgs {
    /// Load settings from a TOML file (flags below are then ignored)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wait window in ms
    #[arg(long, default_value = "200")]
    wait: u64,
    /// Max wait in ms (0 = none)
    #[arg(long, default_value = "0")]
    max_wait: u64,
    /// Invoke on the leading edge
    #[arg(long)]
    leading: bool,
    /// Do not invoke on the trailing edge
    #[arg(long)]
    no_trailing: bool,
    /// Use the throttle preset (leading + trailing, max wait = wait)
    #[arg(long)]
    throttle: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate { edges, burst, interval, jitter, settle, seed, json } => {
            cmd::simulate::run(&edges, burst, interval, jitter, settle, seed, json)
        }
        Commands::Run { edges, threads, duration, settle } => {
            cmd::run::run(&edges, threads, duration, settle)
        }
        Commands::Check { config } => cmd::check::run(&config),
    }
}
