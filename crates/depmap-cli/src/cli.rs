//! CLI argument parsing.

use clap::Parser;

/// Depmap - interactive dependency elicitation interview.
#[derive(Debug, Parser)]
#[command(name = "depmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Elicitation server URL
    #[arg(
        short,
        long,
        env = "DEPMAP_SERVER",
        default_value = "http://127.0.0.1:8080"
    )]
    pub server: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
