//! # Core Type Definitions
//!
//! This module contains the shared types of the store-setup core:
//! - Step identifiers and the derived wizard state (`StepId`, `WizardState`)
//! - Catalog entities (`Product`, `Carrier`, `CarrierPriceRange`)
//! - Error types (`StoreSetupError`)
//!
//! ## Determinism Guarantees
//!
//! All identifiers implement `Ord` so they can key `BTreeMap`/`BTreeSet`.
//! Amounts are integer minor currency units; there is no floating point.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// STEP IDENTIFIERS
// =============================================================================

/// Identifier of a wizard step.
///
/// Step ids of one evaluator are contiguous and start at 1.
/// Numeric order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u32);

impl StepId {
    /// The first step of every wizard.
    pub const FIRST: StepId = StepId(1);

    /// Create a step id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The id that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// WIZARD STATE
// =============================================================================

/// Derived state of a wizard. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "next_step", rename_all = "snake_case")]
pub enum WizardState {
    /// Every configured step is complete.
    Finished,
    /// The contained step is the smallest id that is not complete.
    InProgress(StepId),
}

impl WizardState {
    /// Build the state from the result of a first-incomplete scan.
    #[must_use]
    pub fn from_next_step(next: Option<StepId>) -> Self {
        match next {
            Some(step) => Self::InProgress(step),
            None => Self::Finished,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    #[must_use]
    pub fn next_step(&self) -> Option<StepId> {
        match self {
            Self::Finished => None,
            Self::InProgress(step) => Some(*step),
        }
    }
}

// =============================================================================
// CATALOG IDENTIFIERS
// =============================================================================

/// Identifier of a product in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

/// Identifier of a shipping carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarrierId(pub u64);

/// Identifier of a carrier price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceRangeId(pub u64);

// =============================================================================
// CATALOG ENTITIES
// =============================================================================

/// A product offered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub enabled: bool,
}

/// A shipping carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    pub enabled: bool,
}

/// Shipping price charged by a carrier for orders in `[from_amount, to_amount)`.
///
/// All amounts are minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierPriceRange {
    pub id: PriceRangeId,
    pub carrier: CarrierId,
    pub from_amount: u64,
    pub to_amount: u64,
    pub price: u64,
}

impl CarrierPriceRange {
    /// Check whether an order amount falls inside this range.
    #[must_use]
    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.from_amount && amount < self.to_amount
    }
}

/// A price range that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPriceRange {
    pub carrier: CarrierId,
    pub from_amount: u64,
    pub to_amount: u64,
    pub price: u64,
}

impl NewPriceRange {
    /// Validate the range bounds.
    pub fn validate(&self) -> Result<(), StoreSetupError> {
        if self.from_amount >= self.to_amount {
            return Err(StoreSetupError::InvalidPriceRange {
                from: self.from_amount,
                to: self.to_amount,
            });
        }
        Ok(())
    }

    /// Attach a stored id.
    #[must_use]
    pub fn with_id(self, id: PriceRangeId) -> CarrierPriceRange {
        CarrierPriceRange {
            id,
            carrier: self.carrier,
            from_amount: self.from_amount,
            to_amount: self.to_amount,
            price: self.price,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the store-setup system.
///
/// - Use `Result<T, StoreSetupError>` for fallible operations
/// - Collaborator failures are propagated unchanged; nothing retries them
#[derive(Debug, Error)]
pub enum StoreSetupError {
    /// A completion check's underlying query failed.
    #[error("Collaborator query failed: {0}")]
    Collaborator(String),

    /// The requested step is not configured.
    #[error("Step not found: {0}")]
    StepNotFound(StepId),

    /// Step ids start at 1.
    #[error("Invalid step id: {0}")]
    InvalidStepId(StepId),

    /// The same step id was registered twice.
    #[error("Duplicate step: {0}")]
    DuplicateStep(StepId),

    /// Step ids are not contiguous.
    #[error("Step ids must be contiguous: expected {expected}, found {found}")]
    StepGap { expected: StepId, found: StepId },

    /// The requested product does not exist.
    #[error("Product not found: {0:?}")]
    ProductNotFound(ProductId),

    /// The requested carrier does not exist.
    #[error("Carrier not found: {0:?}")]
    CarrierNotFound(CarrierId),

    /// A price range whose lower bound is not below its upper bound.
    #[error("Invalid price range: {from}..{to}")]
    InvalidPriceRange { from: u64, to: u64 },

    /// Input rejected before reaching storage.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No repository is registered under the given service name.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
