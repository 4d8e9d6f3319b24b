//! Shared output helpers for CLI commands

use debounce::Options;
use owo_colors::OwoColorize;
use std::time::Duration;

/// Format an offset from the start of a run ("0.500s")
pub fn format_offset(offset: Duration) -> String {
    format!("{:.3}s", offset.as_secs_f64())
}

/// One-line summary of debounce settings
pub fn describe(wait: Duration, options: &Options) -> String {
    let max_wait = match options.max_wait {
        Some(max_wait) => format!("{}ms", max_wait.as_millis()),
        None => "none".to_string(),
    };
    format!(
        "wait={}ms leading={} trailing={} max_wait={}",
        wait.as_millis(),
        options.leading,
        options.trailing,
        max_wait
    )
}

/// Print debounce settings as an aligned block
pub fn print_settings(wait: Duration, options: &Options) {
    println!("  {}  {}ms", "wait    ".cyan(), wait.as_millis());
    println!("  {}  {}", "leading ".cyan(), options.leading);
    println!("  {}  {}", "trailing".cyan(), options.trailing);
    match options.max_wait {
        Some(max_wait) => println!("  {}  {}ms", "max_wait".cyan(), max_wait.as_millis()),
        None => println!("  {}  {}", "max_wait".cyan(), "none".dimmed()),
    }
}
