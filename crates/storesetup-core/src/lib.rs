//! # storesetup-core
//!
//! The store-setup wizard engine.
//!
//! The wizard walks a fixed, ordered list of setup steps (address, products,
//! payment, carriers by default) and reports the first one that is not
//! complete. Completion is computed on demand from read-only queries against
//! the catalog; nothing about progress is stored.
//!
//! ## Layout
//!
//! - `evaluator`: ordered step registry and first-incomplete scan
//! - `check` / `oracle`: the completion predicate and the collaborators it queries
//! - `plan`: configuration-driven step lists, including the default wizard
//! - `catalog` / `storage` / `store`: in-memory and redb-backed catalogs
//! - `repository` / `registry`: typed repositories and service-name resolution
//! - `seed`: declarative initial catalog content
//!
//! ## Constraints
//!
//! - Synchronous and single-threaded; no async, no network dependencies
//! - Deterministic: `BTreeMap` only, integer amounts, no randomness
//! - Collaborator failures propagate unchanged; nothing is retried

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod check;
pub mod evaluator;
pub mod oracle;
pub mod plan;
pub mod primitives;
pub mod registry;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Carrier, CarrierId, CarrierPriceRange, NewPriceRange, PriceRangeId, Product, ProductId,
    StepId, StoreSetupError, WizardState,
};

// =============================================================================
// RE-EXPORTS: Wizard Engine
// =============================================================================

pub use check::{
    AlwaysComplete, CheckFn, CompletionCheck, ConfigFlag, EnabledCarriers, EnabledProducts,
};
pub use evaluator::{StepCompletionEvaluator, StepReport, StepStatusMap, WizardReport};
pub use oracle::{CarrierExistenceOracle, ConfigurationOracle, ProductExistenceOracle};
pub use plan::{StepKind, WizardPlan, WizardStep, store_setup_wizard};

// =============================================================================
// RE-EXPORTS: Catalog
// =============================================================================

pub use catalog::{CatalogStore, MemoryCatalog};
pub use registry::RepositoryKind;
pub use repository::{
    CarrierPriceRangeRepository, CarrierRepository, ConfigurationManager, ProductRepository,
    Repositories, Repository,
};
pub use seed::{CatalogSeed, SeedSummary};
pub use storage::RedbCatalog;
pub use store::{Store, StoreBackend};
