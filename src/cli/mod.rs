//! CLI module for platecert
//!
//! Provides command-line interface for:
//! - validate: Build and print a design certificate
//! - hash: Print the well-derived hash of a design
//! - rules: List the rule catalog

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{certificate_envelope, hash, load_config, rules, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_design, write_error, write_response, write_response_to};
