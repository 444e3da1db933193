use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self},
    prelude::*,
};

const CRATE_TARGETS: [&str; 2] = ["plmdca", "plmdca_cli"];

fn level_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Dependencies stay at `warn` (or `error` when quiet); only the plmDCA crates
/// follow `-v`.
fn default_directives(verbosity: u8, quiet: bool) -> String {
    let level = level_directive(verbosity, quiet);
    let global = if quiet { "error" } else { "warn" };
    std::iter::once(global.to_string())
        .chain(CRATE_TARGETS.iter().map(|target| format!("{}={}", target, level)))
        .collect::<Vec<_>>()
        .join(",")
}

fn build_filter(verbosity: u8, quiet: bool, env_directives: Option<String>) -> EnvFilter {
    let directives = env_directives
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| default_directives(verbosity, quiet));
    EnvFilter::builder().parse_lossy(directives)
}

/// Installs the global subscriber. `RUST_LOG`, when set, replaces the
/// directives chosen by `-v`/`-q`.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(
        verbosity,
        quiet,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    }

    Ok(())
}
