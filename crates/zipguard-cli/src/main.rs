//! Zipguard CLI - fingerprint, validate and extract zip archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &cli::Cli, formatter: &dyn output::OutputFormatter) -> anyhow::Result<()> {
    let config = cli.security_config();
    debug!(
        operation = %cli.operation(),
        archive = %cli.archive.display(),
        max_archive_size = config.max_archive_size,
        max_total_size = config.max_total_size,
        max_file_size = config.max_file_size,
        "starting"
    );

    match (&cli.hash, &cli.dir) {
        (Some(hash), Some(dir)) => {
            let request = commands::extract::ExtractRequest {
                archive: &cli.archive,
                expected_hash: hash,
                target: dir,
                prefix: cli.prefix.as_deref(),
            };
            commands::extract::execute(&request, &config, formatter, !cli.quiet && !cli.json)
        }
        _ => commands::hash::execute(&cli.archive, &config, formatter),
    }
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(cli.operation(), &err);
            ExitCode::FAILURE
        }
    }
}
