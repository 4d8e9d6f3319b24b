//! Config file validation

use crate::util::print_settings;
use anyhow::{Context, Result};
use debounce::DebounceConfig;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run the check command
pub fn run(path: &Path) -> Result<()> {
    let config = DebounceConfig::load(path)
        .with_context(|| format!("Invalid config {}", path.display()))?;

    println!("{} {}", "Valid".green().bold(), path.display());
    if config.throttle {
        println!("  {}", "throttle preset".dimmed());
    }
    print_settings(config.wait(), &config.options());

    Ok(())
}
