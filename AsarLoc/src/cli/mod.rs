//! AsarLoc CLI - localize and install Electron app archives

pub mod commands;
pub mod progress;

use std::process::ExitCode;

use clap::Parser;
use commands::Commands;
use console::style;
use tracing::Level;

#[derive(Parser)]
#[command(name = "asarloc", version)]
#[command(about = "AsarLoc: repack Electron app.asar archives with merged translations", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the AsarLoc CLI
///
/// Usage errors and failures both exit with status 1; `--help` and
/// `--version` exit with 0.
#[must_use]
pub fn run_cli() -> ExitCode {
    match Cli::try_parse() {
        Ok(cli) => run(cli),
        Err(e) => {
            let _ = e.print();
            parse_exit_code(&e)
        }
    }
}

/// Help and version output go to stdout and succeed; usage errors fail
fn parse_exit_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> ExitCode {
    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.verbose);
            ExitCode::FAILURE
        }
    }
}

/// Print `error: <message>` and any causes not already part of it
fn report_error(err: &anyhow::Error, verbose: bool) {
    let message = err.to_string();
    eprintln!("{} {message}", style("error:").red().bold());

    let mut shown = message;
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if shown.contains(&cause) {
            continue;
        }
        eprintln!("  {} {cause}", style("caused by:").dim());
        shown.push_str(&cause);
    }

    if verbose {
        eprintln!("{err:?}");
    }
}
