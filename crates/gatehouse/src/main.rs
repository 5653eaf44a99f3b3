//! Gatehouse - Entry Point
//!
//! Binary entry point for the Gatehouse server.

// Force-link gatehouse-providers to ensure linkme registrations are included
extern crate gatehouse_providers;

use clap::Parser;
use gatehouse_server::run;

/// Command line interface for Gatehouse
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Gatehouse - Admission control, read-through cache and work queue server")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Serve HTTP only, without the invalidation listener and queue consumer
    #[arg(long)]
    pub no_workers: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli.config.as_deref(), cli.no_workers).await
}
