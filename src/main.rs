//! Picotest - line-oriented test reporter
//!
//! CLI entry point: reads harness output from stdin and writes formatted
//! progress to stdout.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use picotest::config::ReporterConfig;
use picotest::selftest;

/// Line-oriented test reporter
///
/// Reads interleaved console text and `⚡:<command>:<args>` lines from
/// stdin and renders test progress to stdout.
#[derive(Parser, Debug)]
#[command(name = "picotest", version, about)]
struct Cli {
    /// Pass `test` to run the built-in self-test instead of reading stdin
    mode: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn is_self_test(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("test"))
    }
}

/// Load the configuration file if one was given, else defaults.
fn load_config(path: Option<&PathBuf>) -> Result<ReporterConfig> {
    path.map_or_else(
        || Ok(ReporterConfig::default()),
        |p| {
            ReporterConfig::from_path(p)
                .with_context(|| format!("Failed to load config from '{}'", p.display()))
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.is_self_test() {
        let tally = selftest::run_builtin(std::io::stdout()).context("Self-test aborted")?;
        if tally.failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    debug!(marker = %config.marker, "listening on stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    picotest::run(stdin, std::io::stdout(), &config)
        .await
        .context("Reporter stopped on a protocol error")?;

    Ok(())
}
