//!
//! Command-line entry point. See the library docs for what the conversion does.
//!

use bin2mif::{config::Config, convert, error::ConfigError};
use owo_colors::OwoColorize;
use tracing::Level;

fn main() {
    let config = match Config::get() {
        Ok(config) => config,
        // --help and --version
        Err(ConfigError::CommandLine(e)) if !e.use_stderr() => e.exit(),
        // clap's message already has its own prefix and hint
        Err(ConfigError::CommandLine(e)) => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            eprintln!("Try '{}' for more information.", "bin2mif --help".bright_blue());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            Level::INFO
        } else {
            Level::WARN
        })
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = convert::run(&config) {
        eprintln!("{} {}", "error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}
