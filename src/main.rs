//! Main entry point for the packzip CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use packzip::{Cli, PackError, PlanEngine};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PACKZIP_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match packzip::run(args, &PlanEngine).await {
        Ok(()) => ExitCode::SUCCESS,
        // clap prints its own message and usage, and exits 0 for --help.
        Err(PackError::Cli(err)) => err.exit(),
        Err(err) => {
            eprintln!("{err:#}");
            if err.wants_usage() {
                eprintln!("{}", Cli::usage());
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
