//! clickloop: replay clicks at monitor-relative coordinates, or capture them.

mod commands;
mod logging;

use clap::builder::styling::{AnsiColor, Styles};
use clap::{Parser, Subcommand};
use clickloop_core::InterruptFlag;
use std::process::ExitCode;
use tracing::{error, info, warn};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::Yellow.on_default().bold())
    .literal(AnsiColor::Green.on_default().bold())
    .placeholder(AnsiColor::Cyan.on_default())
    .error(AnsiColor::Red.on_default().bold());

/// Multi-monitor click automation.
///
/// Coordinates are stored relative to a monitor, so a configuration keeps
/// working when the monitor arrangement changes.
#[derive(Parser, Debug)]
#[command(name = "clickloop", version, styles = STYLES)]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not write data/logs/clickloop.log
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Click the configured coordinates in a loop
    Run(commands::run::RunArgs),
    /// Capture coordinates interactively and save them
    Pick(commands::pick::PickArgs),
    /// List detected monitors
    Monitors,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup(cli.verbose, !cli.no_log_file);

    // Before any enumeration so bounds and cursor reads are in physical pixels.
    clickloop_platform::set_dpi_aware();

    let interrupt = InterruptFlag::new();
    let handler_flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_flag.is_raised() {
            // Second Ctrl+C: the first one went unnoticed (blocked on stdin).
            std::process::exit(130);
        }
        handler_flag.raise();
    }) {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let result = match cli.command {
        Command::Run(args) => commands::run::execute(args, interrupt),
        Command::Pick(args) => commands::pick::execute(args, interrupt),
        Command::Monitors => commands::monitors::execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if commands::is_interrupted(&err) => {
            info!("Interrupted by user");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
