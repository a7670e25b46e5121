//! # Store Module
//!
//! A `Store` wraps one of the catalog backends behind a single type so
//! callers can pick storage at runtime.
//!
//! ## Storage Backends
//!
//! - `InMemory`: uses `MemoryCatalog` (fast, volatile)
//! - `Persistent`: uses `RedbCatalog` for disk-backed ACID storage

use crate::catalog::{CatalogStore, MemoryCatalog};
use crate::seed::{CatalogSeed, SeedSummary};
use crate::storage::RedbCatalog;
use crate::{
    Carrier, CarrierId, CarrierPriceRange, NewPriceRange, PriceRangeId, Product, ProductId,
    StoreSetupError,
};
use std::path::Path;

/// Storage backend for a Store.
#[derive(Debug)]
pub enum StoreBackend {
    /// In-memory catalog (fast, volatile).
    InMemory(MemoryCatalog),
    /// Disk-backed catalog using redb (ACID, persistent).
    Persistent(RedbCatalog),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::InMemory(MemoryCatalog::new())
    }
}

// NOTE: Store does not implement Clone; a redb handle cannot be cloned.

/// A catalog store with a runtime-selected backend.
#[derive(Debug, Default)]
pub struct Store {
    backend: StoreBackend,
}

impl Store {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) a redb-backed store.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, StoreSetupError> {
        let catalog = RedbCatalog::open(path)?;
        Ok(Self {
            backend: StoreBackend::Persistent(catalog),
        })
    }

    /// Open a redb-backed store that must already exist.
    pub fn open_redb(path: impl AsRef<Path>) -> Result<Self, StoreSetupError> {
        let catalog = RedbCatalog::open_existing(path)?;
        Ok(Self {
            backend: StoreBackend::Persistent(catalog),
        })
    }

    /// Wrap an existing in-memory catalog.
    #[must_use]
    pub fn with_catalog(catalog: MemoryCatalog) -> Self {
        Self {
            backend: StoreBackend::InMemory(catalog),
        }
    }

    /// Whether writes reach disk.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StoreBackend::Persistent(_))
    }

    fn inner(&self) -> &dyn CatalogStore {
        match &self.backend {
            StoreBackend::InMemory(catalog) => catalog,
            StoreBackend::Persistent(catalog) => catalog,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CatalogStore {
        match &mut self.backend {
            StoreBackend::InMemory(catalog) => catalog,
            StoreBackend::Persistent(catalog) => catalog,
        }
    }
}

impl CatalogStore for Store {
    fn insert_product(&mut self, name: &str, enabled: bool) -> Result<ProductId, StoreSetupError> {
        self.inner_mut().insert_product(name, enabled)
    }

    fn set_product_enabled(
        &mut self,
        id: ProductId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        self.inner_mut().set_product_enabled(id, enabled)
    }

    fn products(&self) -> Result<Vec<Product>, StoreSetupError> {
        self.inner().products()
    }

    fn insert_carrier(&mut self, name: &str, enabled: bool) -> Result<CarrierId, StoreSetupError> {
        self.inner_mut().insert_carrier(name, enabled)
    }

    fn set_carrier_enabled(
        &mut self,
        id: CarrierId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        self.inner_mut().set_carrier_enabled(id, enabled)
    }

    fn carriers(&self) -> Result<Vec<Carrier>, StoreSetupError> {
        self.inner().carriers()
    }

    fn insert_price_range(
        &mut self,
        range: NewPriceRange,
    ) -> Result<PriceRangeId, StoreSetupError> {
        self.inner_mut().insert_price_range(range)
    }

    fn price_ranges(&self) -> Result<Vec<CarrierPriceRange>, StoreSetupError> {
        self.inner().price_ranges()
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        self.inner().config_value(key)
    }

    fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), StoreSetupError> {
        self.inner_mut().set_config_value(key, value)
    }

    fn has_enabled_product(&self) -> Result<bool, StoreSetupError> {
        self.inner().has_enabled_product()
    }

    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        self.inner().has_enabled_carrier()
    }

    fn insert_seed(&mut self, seed: &CatalogSeed) -> Result<SeedSummary, StoreSetupError> {
        self.inner_mut().insert_seed(seed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
