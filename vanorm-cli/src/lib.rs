// vanorm-cli/src/lib.rs
//
// Library portion of the Vanorm CLI application.
// Contains argument definitions, command logic and terminal rendering.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, NormalizeArgs};
pub use commands::normalize::run_normalize;
pub use error::{CliResult, EXIT_CANCELLED, EXIT_FATAL, exit_code_for};

use console::style;
use vanorm_core::CancellationToken;

/// Routes Ctrl-C to `token`. A second Ctrl-C exits immediately.
pub fn install_interrupt_handler(token: CancellationToken) {
    let result = ctrlc::set_handler(move || {
        if token.is_cancelled() {
            std::process::exit(i32::from(EXIT_CANCELLED));
        }
        eprintln!(
            "\n{}",
            style("Received Ctrl+C, stopping the current file...").yellow().bold()
        );
        token.cancel();
    });

    if let Err(e) = result {
        log::warn!("Failed to install Ctrl+C handler: {}", e);
    }
}
