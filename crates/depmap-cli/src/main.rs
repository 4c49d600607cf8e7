//! Depmap CLI - command-line interview for dependency elicitation.

use clap::Parser;
use depmap_cli::{interview, Cli};
use depmap_sdk::HttpApi;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> depmap_cli::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api = HttpApi::new(&cli.server);
    interview::run_interview(api).await
}
