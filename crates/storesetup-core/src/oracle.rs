//! # Oracles
//!
//! Read-only collaborators queried by completion checks.
//!
//! Each oracle exposes the single capability a check needs, not a full
//! repository surface. Implementations must not mutate state when queried.
//! Failures are reported as `StoreSetupError` and reach the caller unchanged.

use crate::StoreSetupError;

/// Answers whether the catalog holds at least one enabled product.
pub trait ProductExistenceOracle {
    fn has_enabled_product(&self) -> Result<bool, StoreSetupError>;
}

/// Answers whether at least one enabled carrier exists.
pub trait CarrierExistenceOracle {
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError>;
}

/// Key lookups against the store configuration.
pub trait ConfigurationOracle {
    /// Get the value stored under `key`, if any.
    fn value(&self, key: &str) -> Result<Option<String>, StoreSetupError>;
}

impl<T: ProductExistenceOracle + ?Sized> ProductExistenceOracle for &T {
    fn has_enabled_product(&self) -> Result<bool, StoreSetupError> {
        (**self).has_enabled_product()
    }
}

impl<T: CarrierExistenceOracle + ?Sized> CarrierExistenceOracle for &T {
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        (**self).has_enabled_carrier()
    }
}

impl<T: ConfigurationOracle + ?Sized> ConfigurationOracle for &T {
    fn value(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        (**self).value(key)
    }
}
