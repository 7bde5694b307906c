//! CLI argument definitions using clap
//!
//! Commands:
//! - platecert validate [--design <path>] [--config <path>] [--strict]
//! - platecert hash [--design <path>]
//! - platecert rules

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// platecert - deterministic validation certificates for plate designs
#[derive(Parser, Debug)]
#[command(name = "platecert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a design and print its certificate
    Validate {
        /// Design document (JSON); read from stdin when omitted
        #[arg(long)]
        design: Option<PathBuf>,

        /// Rule configuration file (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Exit non-zero when the certificate is failing
        #[arg(long)]
        strict: bool,
    },

    /// Print the well-derived hash of a design
    Hash {
        /// Design document (JSON); read from stdin when omitted
        #[arg(long)]
        design: Option<PathBuf>,
    },

    /// List the rules in evaluation order
    Rules,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
