//! Quill CLI
//!
//! Prints the event stream of a tree walk over a document description.

mod cli;
mod commands;
mod config;
mod output;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::init::run_init;
use crate::commands::walk::{WalkArgs, run_walk};
use crate::config::WalkConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Walk {
            file,
            root,
            start,
            end,
            position,
            merge,
            backward,
            format,
        } => {
            let config = WalkConfig::load(cli.config.as_deref()).into_diagnostic()?;
            let args = WalkArgs {
                file,
                root,
                start,
                end,
                position,
                merge,
                backward,
                format,
            };
            run_walk(&args, &config)
        }
        Commands::Init { force } => run_init(Path::new("."), force).map(|_| ()),
    }
}
