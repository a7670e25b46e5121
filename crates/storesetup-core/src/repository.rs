//! # Repositories
//!
//! Narrow, typed views over a [`CatalogStore`]. Each repository exposes only
//! the queries its consumers need and implements the matching oracle, so a
//! completion check never sees the full storage surface.
//!
//! Repositories borrow the store and are `Copy`.

use crate::catalog::CatalogStore;
use crate::oracle::{CarrierExistenceOracle, ConfigurationOracle, ProductExistenceOracle};
use crate::registry::RepositoryKind;
use crate::{Carrier, CarrierId, CarrierPriceRange, Product, StoreSetupError};

// =============================================================================
// PRODUCTS
// =============================================================================

/// Read access to products.
#[derive(Debug)]
pub struct ProductRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> ProductRepository<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Products whose `enabled` flag equals `enabled`.
    pub fn find_by_enabled(&self, enabled: bool) -> Result<Vec<Product>, StoreSetupError> {
        Ok(self
            .store
            .products()?
            .into_iter()
            .filter(|p| p.enabled == enabled)
            .collect())
    }
}

impl<S: CatalogStore + ?Sized> ProductExistenceOracle for ProductRepository<'_, S> {
    fn has_enabled_product(&self) -> Result<bool, StoreSetupError> {
        self.store.has_enabled_product()
    }
}

// =============================================================================
// CARRIERS
// =============================================================================

/// Read access to carriers.
#[derive(Debug)]
pub struct CarrierRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> CarrierRepository<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Carriers whose `enabled` flag equals `enabled`.
    pub fn find_by_enabled(&self, enabled: bool) -> Result<Vec<Carrier>, StoreSetupError> {
        Ok(self
            .store
            .carriers()?
            .into_iter()
            .filter(|c| c.enabled == enabled)
            .collect())
    }
}

impl<S: CatalogStore + ?Sized> CarrierExistenceOracle for CarrierRepository<'_, S> {
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        self.store.has_enabled_carrier()
    }
}

// =============================================================================
// CARRIER PRICE RANGES
// =============================================================================

/// Read access to carrier price ranges.
#[derive(Debug)]
pub struct CarrierPriceRangeRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> CarrierPriceRangeRepository<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ranges of one carrier, ordered by `from_amount`.
    pub fn find_by_carrier(
        &self,
        carrier: CarrierId,
    ) -> Result<Vec<CarrierPriceRange>, StoreSetupError> {
        let mut ranges: Vec<_> = self
            .store
            .price_ranges()?
            .into_iter()
            .filter(|r| r.carrier == carrier)
            .collect();
        ranges.sort_by_key(|r| (r.from_amount, r.id));
        Ok(ranges)
    }

    /// The range that applies to an order amount.
    ///
    /// When ranges overlap, the one with the lowest `from_amount` wins.
    pub fn find_for_amount(
        &self,
        carrier: CarrierId,
        amount: u64,
    ) -> Result<Option<CarrierPriceRange>, StoreSetupError> {
        Ok(self
            .find_by_carrier(carrier)?
            .into_iter()
            .find(|r| r.contains(amount)))
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Read access to configuration values.
#[derive(Debug)]
pub struct ConfigurationManager<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> ConfigurationManager<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        self.store.config_value(key)
    }

    pub fn get_or(&self, key: &str, default: &str) -> Result<String, StoreSetupError> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }
}

impl<S: CatalogStore + ?Sized> ConfigurationOracle for ConfigurationManager<'_, S> {
    fn value(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        self.get(key)
    }
}

// Manual Clone/Copy: derive would require `S: Clone`.
macro_rules! impl_copy_view {
    ($($view:ident),*) => {
        $(
            impl<S: ?Sized> Clone for $view<'_, S> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<S: ?Sized> Copy for $view<'_, S> {}
        )*
    };
}

impl_copy_view!(
    ProductRepository,
    CarrierRepository,
    CarrierPriceRangeRepository,
    ConfigurationManager
);

// =============================================================================
// REPOSITORY SET
// =============================================================================

/// One handle of each repository kind over the same store.
///
/// This is the only construction path for repositories handed out by kind.
#[derive(Debug)]
pub struct Repositories<'a, S: ?Sized> {
    pub products: ProductRepository<'a, S>,
    pub carriers: CarrierRepository<'a, S>,
    pub carrier_price_ranges: CarrierPriceRangeRepository<'a, S>,
    pub configuration: ConfigurationManager<'a, S>,
}

impl<'a, S: CatalogStore + ?Sized> Repositories<'a, S> {
    #[must_use]
    pub fn of(store: &'a S) -> Self {
        Self {
            products: ProductRepository::new(store),
            carriers: CarrierRepository::new(store),
            carrier_price_ranges: CarrierPriceRangeRepository::new(store),
            configuration: ConfigurationManager::new(store),
        }
    }

    /// The repository registered for a kind.
    #[must_use]
    pub fn get(&self, kind: RepositoryKind) -> Repository<'a, S> {
        match kind {
            RepositoryKind::Product => Repository::Product(self.products),
            RepositoryKind::Carrier => Repository::Carrier(self.carriers),
            RepositoryKind::CarrierPriceRange => {
                Repository::CarrierPriceRange(self.carrier_price_ranges)
            }
            RepositoryKind::Configuration => Repository::Configuration(self.configuration),
        }
    }

    /// Resolve a service name (canonical or alias) to its repository.
    pub fn resolve(&self, name: &str) -> Result<Repository<'a, S>, StoreSetupError> {
        Ok(self.get(RepositoryKind::resolve(name)?))
    }
}

/// A repository selected by kind.
#[derive(Debug)]
pub enum Repository<'a, S: ?Sized> {
    Product(ProductRepository<'a, S>),
    Carrier(CarrierRepository<'a, S>),
    CarrierPriceRange(CarrierPriceRangeRepository<'a, S>),
    Configuration(ConfigurationManager<'a, S>),
}

impl<S: ?Sized> Repository<'_, S> {
    #[must_use]
    pub fn kind(&self) -> RepositoryKind {
        match self {
            Repository::Product(_) => RepositoryKind::Product,
            Repository::Carrier(_) => RepositoryKind::Carrier,
            Repository::CarrierPriceRange(_) => RepositoryKind::CarrierPriceRange,
            Repository::Configuration(_) => RepositoryKind::Configuration,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::NewPriceRange;

    fn catalog_with_ranges() -> (MemoryCatalog, CarrierId) {
        let mut catalog = MemoryCatalog::new();
        let post = catalog.insert_carrier("Post", true).expect("insert");
        let courier = catalog.insert_carrier("Courier", false).expect("insert");
        for (from, to, price) in [(5000, 10_000, 295), (0, 5000, 495), (10_000, 1_000_000, 0)] {
            catalog
                .insert_price_range(NewPriceRange {
                    carrier: post,
                    from_amount: from,
                    to_amount: to,
                    price,
                })
                .expect("insert range");
        }
        catalog
            .insert_price_range(NewPriceRange {
                carrier: courier,
                from_amount: 0,
                to_amount: 1_000_000,
                price: 1200,
            })
            .expect("insert range");
        (catalog, post)
    }

    #[test]
    fn find_by_enabled_filters() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert_product("Mug", true).expect("insert");
        catalog.insert_product("Tee", false).expect("insert");

        let products = ProductRepository::new(&catalog);
        assert_eq!(products.find_by_enabled(true).expect("find").len(), 1);
        assert_eq!(products.find_by_enabled(false).expect("find")[0].name, "Tee");
        assert!(products.has_enabled_product().expect("oracle"));
    }

    #[test]
    fn price_ranges_by_carrier_sorted() {
        let (catalog, post) = catalog_with_ranges();
        let ranges = CarrierPriceRangeRepository::new(&catalog)
            .find_by_carrier(post)
            .expect("find");

        let bounds: Vec<_> = ranges.iter().map(|r| r.from_amount).collect();
        assert_eq!(bounds, vec![0, 5000, 10_000]);
    }

    #[test]
    fn price_range_for_amount() {
        let (catalog, post) = catalog_with_ranges();
        let repo = CarrierPriceRangeRepository::new(&catalog);

        let range = repo.find_for_amount(post, 7500).expect("find").expect("range");
        assert_eq!(range.price, 295);

        let range = repo.find_for_amount(post, 10_000).expect("find").expect("range");
        assert_eq!(range.price, 0);

        assert!(repo.find_for_amount(post, 1_000_000).expect("find").is_none());
    }

    #[test]
    fn configuration_manager_defaults() {
        let mut catalog = MemoryCatalog::new();
        catalog.set_config_value("store.currency", "EUR").expect("set");
        let config = ConfigurationManager::new(&catalog);

        assert_eq!(config.get_or("store.currency", "USD").expect("get"), "EUR");
        assert_eq!(config.get_or("store.locale", "en").expect("get"), "en");
        assert_eq!(config.value("store.locale").expect("oracle"), None);
    }

    #[test]
    fn alias_and_canonical_name_resolve_to_same_repository() {
        let (catalog, post) = catalog_with_ranges();
        let repositories = Repositories::of(&catalog);

        let canonical = repositories
            .resolve("storesetup.core.shipping.repository.carrier_price_range")
            .expect("canonical");
        let alias = repositories
            .resolve("storesetup.repository.carrier_price_range")
            .expect("alias");

        assert_eq!(canonical.kind(), RepositoryKind::CarrierPriceRange);
        assert_eq!(canonical.kind(), alias.kind());

        // Both handles are the concrete price-range repository over the same store.
        match (canonical, alias) {
            (Repository::CarrierPriceRange(a), Repository::CarrierPriceRange(b)) => {
                assert_eq!(
                    a.find_by_carrier(post).expect("find"),
                    b.find_by_carrier(post).expect("find")
                );
            }
            _ => unreachable!("resolved kinds were checked above"),
        }
    }

    #[test]
    fn unknown_service_name() {
        let catalog = MemoryCatalog::new();
        assert!(matches!(
            Repositories::of(&catalog).resolve("storesetup.repository.order"),
            Err(StoreSetupError::UnknownService(_))
        ));
    }
}
