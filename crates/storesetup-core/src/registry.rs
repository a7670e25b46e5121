//! # Repository Registry
//!
//! Maps service names to repository kinds at compile time.
//!
//! Every kind has one canonical name and any number of aliases. All names of
//! a kind resolve to the same [`RepositoryKind`], and
//! [`Repositories::get`](crate::repository::Repositories::get) has exactly one
//! construction path per kind.
//!
//! | Kind | Canonical name | Alias |
//! |------|----------------|-------|
//! | Product | `storesetup.core.product.repository.product` | `storesetup.repository.product` |
//! | Carrier | `storesetup.core.shipping.repository.carrier` | `storesetup.repository.carrier` |
//! | CarrierPriceRange | `storesetup.core.shipping.repository.carrier_price_range` | `storesetup.repository.carrier_price_range` |
//! | Configuration | `storesetup.core.configuration.manager` | `storesetup.manager.configuration` |

use crate::StoreSetupError;
use serde::{Deserialize, Serialize};

/// The repositories a store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryKind {
    Product,
    Carrier,
    CarrierPriceRange,
    Configuration,
}

impl RepositoryKind {
    /// All kinds, in registry order.
    pub const ALL: [RepositoryKind; 4] = [
        RepositoryKind::Product,
        RepositoryKind::Carrier,
        RepositoryKind::CarrierPriceRange,
        RepositoryKind::Configuration,
    ];

    /// The canonical service name.
    #[must_use]
    pub fn canonical_name(&self) -> &'static str {
        match self {
            RepositoryKind::Product => "storesetup.core.product.repository.product",
            RepositoryKind::Carrier => "storesetup.core.shipping.repository.carrier",
            RepositoryKind::CarrierPriceRange => {
                "storesetup.core.shipping.repository.carrier_price_range"
            }
            RepositoryKind::Configuration => "storesetup.core.configuration.manager",
        }
    }

    /// Short aliases for the canonical name.
    #[must_use]
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            RepositoryKind::Product => &["storesetup.repository.product"],
            RepositoryKind::Carrier => &["storesetup.repository.carrier"],
            RepositoryKind::CarrierPriceRange => &["storesetup.repository.carrier_price_range"],
            RepositoryKind::Configuration => &["storesetup.manager.configuration"],
        }
    }

    /// Every name this kind answers to, canonical first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.canonical_name()).chain(self.aliases().iter().copied())
    }

    /// Resolve a canonical name or alias.
    pub fn resolve(name: &str) -> Result<Self, StoreSetupError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.names().any(|candidate| candidate == name))
            .ok_or_else(|| StoreSetupError::UnknownService(name.to_string()))
    }

    /// Short human-readable name.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            RepositoryKind::Product => "product repository",
            RepositoryKind::Carrier => "carrier repository",
            RepositoryKind::CarrierPriceRange => "carrier price range repository",
            RepositoryKind::Configuration => "configuration manager",
        }
    }
}

impl std::fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}
