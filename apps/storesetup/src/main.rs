//! # storesetup - Store-Setup Wizard CLI
//!
//! Reports which setup steps of a store are complete and manages the
//! catalog those steps read.
//!
//! ## Usage
//!
//! ```bash
//! storesetup init
//! storesetup product add "Coffee mug"
//! storesetup carrier add "Parcel post"
//! storesetup status
//! storesetup next --json-mode
//! ```

use clap::Parser;
use storesetup::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // STORESETUP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("STORESETUP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "storesetup=debug,storesetup_core=debug"
    } else {
        "storesetup=info,storesetup_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays clean for --json-mode.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::execute(cli, &mut out) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
