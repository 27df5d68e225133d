//! CLI for the scout server
//!
//! Argument parsing for the `scout-server` binary.

use clap::Parser;
use std::path::PathBuf;

/// S.C.O.U.T - Similar-project orchestration server
#[derive(Parser, Debug)]
#[command(
    name = "scout-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "S.C.O.U.T - Similar-project orchestration server",
    long_about = "Routes natural-language queries about similar past projects to\n\
                  specialized search capabilities (GitLab, GitHub, document store),\n\
                  runs them concurrently, and merges their findings into one answer."
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "scout.toml")]
    pub config: PathBuf,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    pub verbose: bool,
}
