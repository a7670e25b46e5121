//! # Catalog Storage
//!
//! The catalog holds the entities the wizard checks read: products,
//! carriers, carrier price ranges and configuration values.
//!
//! [`CatalogStore`] is implemented by the in-memory [`MemoryCatalog`] and by
//! the disk-backed `RedbCatalog` (see `storage`). Ids are assigned
//! sequentially from 1 per entity kind.

use crate::primitives::{MAX_CONFIG_KEY_LENGTH, MAX_CONFIG_VALUE_LENGTH, MAX_NAME_LENGTH};
use crate::seed::{CatalogSeed, SeedSummary};
use crate::{
    Carrier, CarrierId, CarrierPriceRange, NewPriceRange, PriceRangeId, Product, ProductId,
    StoreSetupError,
};
use std::collections::BTreeMap;

// =============================================================================
// CATALOG STORE TRAIT
// =============================================================================

/// Storage operations shared by all catalog backends.
///
/// Listing methods return entities in ascending id order.
pub trait CatalogStore {
    /// Insert a product and return its id.
    fn insert_product(&mut self, name: &str, enabled: bool) -> Result<ProductId, StoreSetupError>;

    /// Enable or disable an existing product.
    fn set_product_enabled(&mut self, id: ProductId, enabled: bool)
    -> Result<(), StoreSetupError>;

    /// All products.
    fn products(&self) -> Result<Vec<Product>, StoreSetupError>;

    /// Insert a carrier and return its id.
    fn insert_carrier(&mut self, name: &str, enabled: bool) -> Result<CarrierId, StoreSetupError>;

    /// Enable or disable an existing carrier.
    fn set_carrier_enabled(&mut self, id: CarrierId, enabled: bool)
    -> Result<(), StoreSetupError>;

    /// All carriers.
    fn carriers(&self) -> Result<Vec<Carrier>, StoreSetupError>;

    /// Insert a price range for an existing carrier.
    fn insert_price_range(&mut self, range: NewPriceRange)
    -> Result<PriceRangeId, StoreSetupError>;

    /// All price ranges.
    fn price_ranges(&self) -> Result<Vec<CarrierPriceRange>, StoreSetupError>;

    /// Configuration value stored under `key`.
    fn config_value(&self, key: &str) -> Result<Option<String>, StoreSetupError>;

    /// Store a configuration value, replacing any previous one.
    fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), StoreSetupError>;

    /// True if at least one product is enabled.
    fn has_enabled_product(&self) -> Result<bool, StoreSetupError> {
        Ok(self.products()?.iter().any(|p| p.enabled))
    }

    /// True if at least one carrier is enabled.
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        Ok(self.carriers()?.iter().any(|c| c.enabled))
    }

    /// Insert an already validated seed.
    ///
    /// Use [`CatalogSeed::apply`], which validates first. Backends with
    /// transactions override this to write the whole seed atomically.
    fn insert_seed(&mut self, seed: &CatalogSeed) -> Result<SeedSummary, StoreSetupError> {
        crate::seed::insert_rows(self, seed)
    }
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

/// Validate a product or carrier name.
pub fn validate_name(name: &str) -> Result<(), StoreSetupError> {
    if name.trim().is_empty() {
        return Err(StoreSetupError::InvalidInput("name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(StoreSetupError::InvalidInput(format!(
            "name exceeds {} bytes",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate a configuration key/value pair.
pub fn validate_config_entry(key: &str, value: &str) -> Result<(), StoreSetupError> {
    validate_config_key(key)?;
    if value.len() > MAX_CONFIG_VALUE_LENGTH {
        return Err(StoreSetupError::InvalidInput(format!(
            "configuration value exceeds {} bytes",
            MAX_CONFIG_VALUE_LENGTH
        )));
    }
    Ok(())
}

/// Validate a configuration key.
pub fn validate_config_key(key: &str) -> Result<(), StoreSetupError> {
    if key.trim().is_empty() {
        return Err(StoreSetupError::InvalidInput(
            "configuration key must not be empty".into(),
        ));
    }
    if key.len() > MAX_CONFIG_KEY_LENGTH {
        return Err(StoreSetupError::InvalidInput(format!(
            "configuration key exceeds {} bytes",
            MAX_CONFIG_KEY_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// IN-MEMORY CATALOG
// =============================================================================

/// Volatile catalog backed by `BTreeMap`s.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: BTreeMap<ProductId, Product>,
    carriers: BTreeMap<CarrierId, Carrier>,
    price_ranges: BTreeMap<PriceRangeId, CarrierPriceRange>,
    config: BTreeMap<String, String>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id<K: Ord, V>(map: &BTreeMap<K, V>, raw: impl Fn(&K) -> u64) -> u64 {
        map.keys()
            .next_back()
            .map_or(1, |last| raw(last).saturating_add(1))
    }
}

impl CatalogStore for MemoryCatalog {
    fn insert_product(&mut self, name: &str, enabled: bool) -> Result<ProductId, StoreSetupError> {
        validate_name(name)?;
        let id = ProductId(Self::next_id(&self.products, |k| k.0));
        self.products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                enabled,
            },
        );
        Ok(id)
    }

    fn set_product_enabled(
        &mut self,
        id: ProductId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        let product = self
            .products
            .get_mut(&id)
            .ok_or(StoreSetupError::ProductNotFound(id))?;
        product.enabled = enabled;
        Ok(())
    }

    fn products(&self) -> Result<Vec<Product>, StoreSetupError> {
        Ok(self.products.values().cloned().collect())
    }

    fn insert_carrier(&mut self, name: &str, enabled: bool) -> Result<CarrierId, StoreSetupError> {
        validate_name(name)?;
        let id = CarrierId(Self::next_id(&self.carriers, |k| k.0));
        self.carriers.insert(
            id,
            Carrier {
                id,
                name: name.to_string(),
                enabled,
            },
        );
        Ok(id)
    }

    fn set_carrier_enabled(
        &mut self,
        id: CarrierId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        let carrier = self
            .carriers
            .get_mut(&id)
            .ok_or(StoreSetupError::CarrierNotFound(id))?;
        carrier.enabled = enabled;
        Ok(())
    }

    fn carriers(&self) -> Result<Vec<Carrier>, StoreSetupError> {
        Ok(self.carriers.values().cloned().collect())
    }

    fn insert_price_range(
        &mut self,
        range: NewPriceRange,
    ) -> Result<PriceRangeId, StoreSetupError> {
        range.validate()?;
        if !self.carriers.contains_key(&range.carrier) {
            return Err(StoreSetupError::CarrierNotFound(range.carrier));
        }
        let id = PriceRangeId(Self::next_id(&self.price_ranges, |k| k.0));
        self.price_ranges.insert(id, range.with_id(id));
        Ok(id)
    }

    fn price_ranges(&self) -> Result<Vec<CarrierPriceRange>, StoreSetupError> {
        Ok(self.price_ranges.values().cloned().collect())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        Ok(self.config.get(key).cloned())
    }

    fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), StoreSetupError> {
        validate_config_entry(key, value)?;
        self.config.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_per_kind() {
        let mut catalog = MemoryCatalog::new();
        assert_eq!(catalog.insert_product("Mug", true).expect("insert"), ProductId(1));
        assert_eq!(catalog.insert_product("Tee", false).expect("insert"), ProductId(2));
        assert_eq!(catalog.insert_carrier("Post", true).expect("insert"), CarrierId(1));
    }

    #[test]
    fn enabled_product_detection() {
        let mut catalog = MemoryCatalog::new();
        assert!(!catalog.has_enabled_product().expect("query"));

        let id = catalog.insert_product("Mug", false).expect("insert");
        assert!(!catalog.has_enabled_product().expect("query"));

        catalog.set_product_enabled(id, true).expect("enable");
        assert!(catalog.has_enabled_product().expect("query"));
    }

    #[test]
    fn unknown_ids_rejected() {
        let mut catalog = MemoryCatalog::new();
        assert!(matches!(
            catalog.set_product_enabled(ProductId(9), true),
            Err(StoreSetupError::ProductNotFound(ProductId(9)))
        ));
        assert!(matches!(
            catalog.set_carrier_enabled(CarrierId(9), true),
            Err(StoreSetupError::CarrierNotFound(CarrierId(9)))
        ));
    }

    #[test]
    fn price_range_requires_carrier() {
        let mut catalog = MemoryCatalog::new();
        let range = NewPriceRange {
            carrier: CarrierId(1),
            from_amount: 0,
            to_amount: 1000,
            price: 300,
        };
        assert!(matches!(
            catalog.insert_price_range(range),
            Err(StoreSetupError::CarrierNotFound(CarrierId(1)))
        ));

        catalog.insert_carrier("Post", true).expect("insert");
        assert_eq!(
            catalog.insert_price_range(range).expect("insert"),
            PriceRangeId(1)
        );
        assert_eq!(catalog.price_ranges().expect("list").len(), 1);
    }

    #[test]
    fn empty_names_and_keys_rejected() {
        let mut catalog = MemoryCatalog::new();
        assert!(matches!(
            catalog.insert_product("  ", true),
            Err(StoreSetupError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.set_config_value("", "1"),
            Err(StoreSetupError::InvalidInput(_))
        ));
    }

    #[test]
    fn config_values_overwrite() {
        let mut catalog = MemoryCatalog::new();
        catalog.set_config_value("store.name", "Acme").expect("set");
        catalog.set_config_value("store.name", "Acme Ltd").expect("set");
        assert_eq!(
            catalog.config_value("store.name").expect("get").as_deref(),
            Some("Acme Ltd")
        );
        assert_eq!(catalog.config_value("store.missing").expect("get"), None);
    }
}
