//! Command-line interface argument parsing
//!
//! The binary either runs the given `-c` lines in order or drops into an
//! interactive read loop.

use clap::Parser;
use std::path::PathBuf;

/// shls - A small shell whose `ls` follows the Unix option rules
///
/// Runs `ls`, `cd` and `exit` against a simulated session.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "shls")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Command line to run instead of the interactive loop (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Vec<String>,

    /// Read configuration from this file instead of ~/.shls.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Starting directory for the session
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}
