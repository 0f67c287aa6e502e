//! # docload: JSON-to-Firestore loader
//!
//! Thin entrypoint; all logic lives in the `docload_cli` library crate.

use anyhow::Result;
use clap::Parser;
use docload::EXIT_FAILURE;
use docload_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr so stdout carries only the upload report.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("docload=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            println!(
                "✅ All {} records uploaded to collection '{}'.",
                report.count(),
                report.collection
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error uploading data: {e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
