//! # Completion Checks
//!
//! A completion check is the predicate behind one wizard step. The evaluator
//! only sees the [`CompletionCheck`] capability, so steps can be added,
//! removed or reordered without touching the scanning logic.

use crate::oracle::{CarrierExistenceOracle, ConfigurationOracle, ProductExistenceOracle};
use crate::primitives::is_truthy;
use crate::StoreSetupError;

/// A read-only, boolean-valued check against external state.
pub trait CompletionCheck {
    /// Human-readable name of the step this check backs.
    fn label(&self) -> &str;

    /// Evaluate the check. Errors from collaborators are returned as-is.
    fn is_complete(&self) -> Result<bool, StoreSetupError>;
}

impl<T: CompletionCheck + ?Sized> CompletionCheck for Box<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        (**self).is_complete()
    }
}

// =============================================================================
// CONSTANT CHECK
// =============================================================================

/// A check that is always satisfied.
///
/// Backs the address and payment steps, which have no real validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlwaysComplete {
    label: String,
}

impl AlwaysComplete {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl CompletionCheck for AlwaysComplete {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        Ok(true)
    }
}

// =============================================================================
// EXISTENCE CHECKS
// =============================================================================

/// Complete once at least one enabled product exists.
#[derive(Debug, Clone)]
pub struct EnabledProducts<O> {
    label: String,
    oracle: O,
}

impl<O: ProductExistenceOracle> EnabledProducts<O> {
    #[must_use]
    pub fn new(label: impl Into<String>, oracle: O) -> Self {
        Self {
            label: label.into(),
            oracle,
        }
    }
}

impl<O: ProductExistenceOracle> CompletionCheck for EnabledProducts<O> {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        self.oracle.has_enabled_product()
    }
}

/// Complete once at least one enabled carrier exists.
#[derive(Debug, Clone)]
pub struct EnabledCarriers<O> {
    label: String,
    oracle: O,
}

impl<O: CarrierExistenceOracle> EnabledCarriers<O> {
    #[must_use]
    pub fn new(label: impl Into<String>, oracle: O) -> Self {
        Self {
            label: label.into(),
            oracle,
        }
    }
}

impl<O: CarrierExistenceOracle> CompletionCheck for EnabledCarriers<O> {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        self.oracle.has_enabled_carrier()
    }
}

// =============================================================================
// CONFIGURATION CHECK
// =============================================================================

/// Complete when a configuration key holds a truthy value.
///
/// A missing key counts as not complete.
#[derive(Debug, Clone)]
pub struct ConfigFlag<O> {
    label: String,
    key: String,
    oracle: O,
}

impl<O: ConfigurationOracle> ConfigFlag<O> {
    #[must_use]
    pub fn new(label: impl Into<String>, key: impl Into<String>, oracle: O) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            oracle,
        }
    }
}

impl<O: ConfigurationOracle> CompletionCheck for ConfigFlag<O> {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        Ok(self
            .oracle
            .value(&self.key)?
            .is_some_and(|value| is_truthy(&value)))
    }
}

// =============================================================================
// CLOSURE CHECK
// =============================================================================

/// An ad-hoc check backed by a closure.
pub struct CheckFn<F> {
    label: String,
    check: F,
}

impl<F> CheckFn<F>
where
    F: Fn() -> Result<bool, StoreSetupError>,
{
    pub fn new(label: impl Into<String>, check: F) -> Self {
        Self {
            label: label.into(),
            check,
        }
    }
}

impl<F> std::fmt::Debug for CheckFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckFn")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<F> CompletionCheck for CheckFn<F>
where
    F: Fn() -> Result<bool, StoreSetupError>,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn is_complete(&self) -> Result<bool, StoreSetupError> {
        (self.check)()
    }
}

// =============================================================================
// TESTS
// =============================================================================
