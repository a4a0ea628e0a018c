//! pyseed CLI - Python project scaffolding
//!
//! This is the main entry point for the pyseed command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use pyseed_projects::flags;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Help words short-circuit before anything touches the filesystem
    if flags::wants_help(cli.args.as_slice()) {
        Cli::command().print_long_help()?;
        return Ok(());
    }

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = commands::scaffold::run(cli).await {
        output::error(&error_chain(&e));
        std::process::exit(1);
    }
    Ok(())
}

/// Join an error and its causes, skipping causes whose text is already shown
fn error_chain(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Status lines go through `output`; logs only show warnings unless asked
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
