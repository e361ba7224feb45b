//! CLI for bufmeter.

mod commands;

use anyhow::Result;
use bufmeter_core::config;
use bufmeter_core::ranges::TimeRange;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_estimate, run_probe, run_replay};

/// Top-level CLI for bufmeter.
#[derive(Debug, Parser)]
#[command(name = "bufmeter")]
#[command(about = "bufmeter: estimate downloaded media bytes from buffered time ranges", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Estimate bytes for a set of buffered ranges.
    Estimate {
        /// Media duration in seconds.
        #[arg(long)]
        duration: f64,
        /// Total resource size in bytes.
        #[arg(long, value_name = "BYTES")]
        size: u64,
        /// Buffered range as START:END seconds; repeat for several ranges.
        #[arg(long = "range", value_name = "START:END", value_parser = parse_range)]
        ranges: Vec<TimeRange>,
        /// Merge gap in seconds (default from config).
        #[arg(long)]
        epsilon: Option<f64>,
    },

    /// Resolve the total size of a resource with HEAD (or a one-byte GET).
    Probe {
        /// Direct HTTP/HTTPS URL of the media resource.
        url: String,
    },

    /// Replay a recorded trace through a tracker and print its emissions.
    Replay {
        /// Path to the TOML trace.
        path: PathBuf,
        /// Total size in bytes; overrides the trace and skips probing.
        #[arg(long, value_name = "BYTES")]
        size: Option<u64>,
        /// POST each record as JSON to this URL as well.
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
}

/// Parses `START:END` (seconds) into a range. Bounds are not validated here.
fn parse_range(s: &str) -> Result<TimeRange, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got {s:?}"))?;
    let start: f64 = start
        .trim()
        .parse()
        .map_err(|e| format!("bad start {start:?}: {e}"))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|e| format!("bad end {end:?}: {e}"))?;
    Ok(TimeRange { start, end })
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Estimate {
                duration,
                size,
                ranges,
                epsilon,
            } => {
                let epsilon = epsilon.unwrap_or(cfg.range_merge_epsilon_secs);
                run_estimate(&ranges, duration, size, epsilon)?;
            }
            CliCommand::Probe { url } => run_probe(&url).await?,
            CliCommand::Replay {
                path,
                size,
                endpoint,
            } => run_replay(cfg, &path, size, endpoint).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
