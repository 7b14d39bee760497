//! taskmgr - flat-file task tracker CLI
//!
//! Tracks tasks assigned to registered users in plain text files and renders
//! task and user overview reports.

use clap::Parser;
use taskmgr::cli::Cli;
use taskmgr::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Upper bound on a RUST_LOG directive we are willing to parse.
const MAX_FILTER_LEN: usize = 4096;

fn log_filter() -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(raw) if !raw.trim().is_empty() && raw.len() <= MAX_FILTER_LEN => {
            EnvFilter::try_new(raw.trim()).unwrap_or_else(|_| EnvFilter::new("off"))
        }
        _ => EnvFilter::new("off"),
    }
}

fn main() {
    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(log_filter())
        .init();

    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = cli.run() {
        tracing::debug!(%err, %command, "command failed");
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
