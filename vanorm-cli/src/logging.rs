// ============================================================================
// vanorm-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Initialization
//
// The core library logs through the `log` facade; the CLI installs
// env_logger as the backend, writing to stderr so stdout stays free for the
// report (or the JSON summary).
//
// USAGE:
// - default: info
// - `-v`: debug
// - RUST_LOG, when set, replaces both

use console::style;
use log::LevelFilter;
use std::io::Write;

/// Returns the level used when RUST_LOG is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Error => style("ERROR").red().bold(),
                log::Level::Warn => style("WARN ").yellow(),
                log::Level::Info => style("INFO ").green(),
                log::Level::Debug => style("DEBUG").blue(),
                log::Level::Trace => style("TRACE").magenta(),
            };
            writeln!(
                buf,
                "{} {} {}",
                style(chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).dim(),
                level,
                record.args()
            )
        });

    // A logger may already be installed when running under a test harness
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), LevelFilter::Info);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }
}
