// vanorm-cli/src/main.rs
//
// Entry point for the `vanorm` binary: parses arguments, sets up logging and
// Ctrl-C handling, runs the command and maps the outcome to an exit code.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use vanorm_cli::{
    Cli, Commands, EXIT_FATAL, exit_code_for, install_interrupt_handler, logging, run_normalize,
};
use vanorm_core::CancellationToken;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    let result = match cli.command {
        Commands::Normalize(args) => run_normalize(args, cancel),
    };

    match result {
        Ok(summary) => ExitCode::from(exit_code_for(&summary)),
        Err(e) => {
            log::debug!("Fatal error: {:?}", e);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
