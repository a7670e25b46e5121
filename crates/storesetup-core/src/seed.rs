//! # Catalog Seed
//!
//! Declarative description of an initial catalog. The app parses seeds from
//! TOML; this module only defines the shape and applies it to a store.

use crate::catalog::{CatalogStore, validate_config_entry, validate_name};
use crate::{CarrierId, NewPriceRange, StoreSetupError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn enabled_by_default() -> bool {
    true
}

/// A product to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// A price range attached to the carrier it is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeSeed {
    pub from: u64,
    pub to: u64,
    pub price: u64,
}

impl PriceRangeSeed {
    /// The range as stored for `carrier`.
    #[must_use]
    pub fn for_carrier(&self, carrier: CarrierId) -> NewPriceRange {
        NewPriceRange {
            carrier,
            from_amount: self.from,
            to_amount: self.to,
            price: self.price,
        }
    }
}

/// A carrier to insert, with its price ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierSeed {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub price_ranges: Vec<PriceRangeSeed>,
}

/// Initial catalog content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub products: Vec<ProductSeed>,
    pub carriers: Vec<CarrierSeed>,
    pub configuration: BTreeMap<String, String>,
}

/// Number of rows written by [`CatalogSeed::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub products: usize,
    pub carriers: usize,
    pub price_ranges: usize,
    pub configuration: usize,
}

impl CatalogSeed {
    /// Check every row without touching a store.
    ///
    /// Covers names, price range bounds and configuration entries, so a seed
    /// that passes can only fail to apply on a storage error.
    pub fn validate(&self) -> Result<(), StoreSetupError> {
        for product in &self.products {
            validate_name(&product.name)?;
        }
        for carrier in &self.carriers {
            validate_name(&carrier.name)?;
            for range in &carrier.price_ranges {
                if range.from >= range.to {
                    return Err(StoreSetupError::InvalidPriceRange {
                        from: range.from,
                        to: range.to,
                    });
                }
            }
        }
        for (key, value) in &self.configuration {
            validate_config_entry(key, value)?;
        }
        Ok(())
    }

    /// Validate the seed, then insert it into a store in declaration order.
    ///
    /// Nothing is written when validation fails.
    pub fn apply<S: CatalogStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<SeedSummary, StoreSetupError> {
        self.validate()?;
        let summary = store.insert_seed(self)?;

        tracing::info!(
            products = summary.products,
            carriers = summary.carriers,
            price_ranges = summary.price_ranges,
            configuration = summary.configuration,
            "catalog seed applied"
        );
        Ok(summary)
    }
}

/// Insert a validated seed row by row through the store's own operations.
pub(crate) fn insert_rows<S: CatalogStore + ?Sized>(
    store: &mut S,
    seed: &CatalogSeed,
) -> Result<SeedSummary, StoreSetupError> {
    let mut summary = SeedSummary::default();

    for product in &seed.products {
        store.insert_product(&product.name, product.enabled)?;
        summary.products += 1;
    }

    for carrier in &seed.carriers {
        let id = store.insert_carrier(&carrier.name, carrier.enabled)?;
        summary.carriers += 1;

        for range in &carrier.price_ranges {
            store.insert_price_range(range.for_carrier(id))?;
            summary.price_ranges += 1;
        }
    }

    for (key, value) in &seed.configuration {
        store.set_config_value(key, value)?;
        summary.configuration += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn apply_seed() {
        let mut configuration = BTreeMap::new();
        configuration.insert("store.currency".to_string(), "EUR".to_string());

        let seed = CatalogSeed {
            products: vec![ProductSeed {
                name: "Mug".into(),
                enabled: true,
            }],
            carriers: vec![CarrierSeed {
                name: "Post".into(),
                enabled: false,
                price_ranges: vec![
                    PriceRangeSeed {
                        from: 0,
                        to: 5000,
                        price: 495,
                    },
                    PriceRangeSeed {
                        from: 5000,
                        to: 100_000,
                        price: 0,
                    },
                ],
            }],
            configuration,
        };

        let mut catalog = MemoryCatalog::new();
        let summary = seed.apply(&mut catalog).expect("apply");

        assert_eq!(
            summary,
            SeedSummary {
                products: 1,
                carriers: 1,
                price_ranges: 2,
                configuration: 1,
            }
        );
        assert!(catalog.has_enabled_product().expect("query"));
        assert!(!catalog.has_enabled_carrier().expect("query"));
    }

    #[test]
    fn invalid_range_rejects_whole_seed() {
        let seed = CatalogSeed {
            products: vec![ProductSeed {
                name: "Mug".into(),
                enabled: true,
            }],
            carriers: vec![CarrierSeed {
                name: "Post".into(),
                enabled: true,
                price_ranges: vec![PriceRangeSeed {
                    from: 10,
                    to: 5,
                    price: 1,
                }],
            }],
            ..CatalogSeed::default()
        };

        let mut catalog = MemoryCatalog::new();
        assert!(matches!(
            seed.apply(&mut catalog),
            Err(StoreSetupError::InvalidPriceRange { from: 10, to: 5 })
        ));
        assert!(catalog.products().expect("list").is_empty());
        assert!(catalog.carriers().expect("list").is_empty());
    }

    #[test]
    fn validate_checks_names_and_configuration() {
        let blank_product = CatalogSeed {
            products: vec![ProductSeed {
                name: "  ".into(),
                enabled: true,
            }],
            ..CatalogSeed::default()
        };
        assert!(matches!(
            blank_product.validate(),
            Err(StoreSetupError::InvalidInput(_))
        ));

        let mut configuration = BTreeMap::new();
        configuration.insert(String::new(), "EUR".to_string());
        let blank_key = CatalogSeed {
            configuration,
            ..CatalogSeed::default()
        };
        assert!(matches!(
            blank_key.validate(),
            Err(StoreSetupError::InvalidInput(_))
        ));

        assert!(CatalogSeed::default().validate().is_ok());
    }
}
