//! # Storage Module
//!
//! Persistent catalog storage.

mod redb_catalog;

pub use redb_catalog::RedbCatalog;
