//! # blockscript-cli
//!
//! Compile block programs and run them against the reference games.
//!
//! ## Usage
//!
//! ```bash
//! # Print the compiled instructions
//! blockscript compile program.json --game artist --pretty
//!
//! # Play a maze level, animating each step for 300ms
//! blockscript run program.json --game maze --level level.json --step-ms 300
//!
//! # List the game presets
//! blockscript presets
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

pub mod args;
pub mod commands;
pub mod error;

pub use error::{CliError, Result};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging on stderr.
///
/// Use `RUST_LOG` to override the default `info` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
