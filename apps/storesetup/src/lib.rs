//! # storesetup
//!
//! Command-line front end for the store-setup wizard.
//!
//! - [`cli`] - argument parsing and command implementations
//! - [`config`] - the optional `storesetup.toml` file

pub mod cli;
pub mod config;
