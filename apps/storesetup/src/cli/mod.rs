//! # storesetup CLI Module
//!
//! ## Available Commands
//!
//! - `init` - Create an empty catalog database
//! - `status` - Show every wizard step and the next one to complete
//! - `next` - Print the next incomplete step id
//! - `product` / `carrier` - Add, enable, disable and list catalog entries
//! - `price-range` - Add, list and quote carrier price ranges
//! - `config` - Read and write configuration values
//! - `seed` - Load a catalog from a TOML seed file
//! - `resolve` - Resolve a repository service name

mod commands;

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use storesetup_core::StoreSetupError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// storesetup - store-setup wizard status
///
/// Tracks which setup steps of a store are complete, in order.
#[derive(Parser, Debug)]
#[command(name = "storesetup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to the catalog database (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new empty database
    Init {
        /// Overwrite an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Show the status of every wizard step
    Status,

    /// Show the next incomplete step
    Next,

    /// Manage products
    Product {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage shipping carriers
    Carrier {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage carrier price ranges
    PriceRange {
        #[command(subcommand)]
        action: PriceRangeAction,
    },

    /// Read or write configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Load products, carriers and configuration from a TOML file
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Resolve a repository service name or alias
    Resolve {
        /// Service name, e.g. storesetup.repository.carrier_price_range
        name: String,
    },
}

/// Actions shared by products and carriers.
#[derive(Subcommand, Debug)]
pub enum EntityAction {
    /// Add a new entry
    Add {
        /// Display name
        name: String,

        /// Create the entry disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Enable an entry
    Enable { id: u64 },

    /// Disable an entry
    Disable { id: u64 },

    /// List all entries
    List,
}

#[derive(Subcommand, Debug)]
pub enum PriceRangeAction {
    /// Add a price range for a carrier
    Add {
        #[arg(long)]
        carrier: u64,

        /// Lower bound (inclusive), minor currency units
        #[arg(long)]
        from: u64,

        /// Upper bound (exclusive), minor currency units
        #[arg(long)]
        to: u64,

        /// Shipping price, minor currency units
        #[arg(long)]
        price: u64,
    },

    /// List price ranges, optionally for one carrier
    List {
        #[arg(long)]
        carrier: Option<u64>,
    },

    /// Find the price range that applies to an order amount
    Quote {
        #[arg(long)]
        carrier: u64,

        #[arg(long)]
        amount: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print a configuration value
    Get { key: String },

    /// Store a configuration value
    Set { key: String, value: String },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), StoreSetupError> {
    let config = AppConfig::load(&cli.config)?;
    let ctx = Context {
        database: cli.database.unwrap_or(config.database),
        plan: config.wizard,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&ctx, out, force),
        Some(Commands::Status) | None => cmd_status(&ctx, out),
        Some(Commands::Next) => cmd_next(&ctx, out),
        Some(Commands::Product { action }) => cmd_product(&ctx, out, action),
        Some(Commands::Carrier { action }) => cmd_carrier(&ctx, out, action),
        Some(Commands::PriceRange { action }) => cmd_price_range(&ctx, out, action),
        Some(Commands::Config { action }) => cmd_config(&ctx, out, action),
        Some(Commands::Seed { file }) => cmd_seed(&ctx, out, &file),
        Some(Commands::Resolve { name }) => cmd_resolve(&ctx, out, &name),
    }
}
