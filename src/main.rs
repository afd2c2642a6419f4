use clap::Parser;
use colored::Colorize;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use nestrepo::presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match CliApp::from_cli(cli).run().await {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output with `--verbose`
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "nestrepo=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
