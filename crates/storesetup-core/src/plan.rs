//! # Wizard Plan
//!
//! Configuration-driven list of wizard steps.
//!
//! A plan is an ordered list of [`StepKind`]s. Building a plan assigns ids
//! `1..=N` by position and wires each kind to its completion check. The
//! default plan is the four-step store setup:
//!
//! | Step | Kind | Complete when |
//! |------|------|---------------|
//! | 1 | address | always (no validation yet) |
//! | 2 | products | an enabled product exists |
//! | 3 | payment | always (no validation yet) |
//! | 4 | carriers | an enabled carrier exists |

use crate::catalog::CatalogStore;
use crate::check::{AlwaysComplete, ConfigFlag, EnabledCarriers, EnabledProducts};
use crate::evaluator::StepCompletionEvaluator;
use crate::oracle::{CarrierExistenceOracle, ConfigurationOracle, ProductExistenceOracle};
use crate::primitives::{DEFAULT_STEP_COUNT, MAX_STEPS};
use crate::repository::Repositories;
use crate::{StepId, StoreSetupError};
use serde::{Deserialize, Serialize};

// =============================================================================
// DEFAULT STEPS
// =============================================================================

/// The steps of the default store-setup wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Address,
    Products,
    Payment,
    Carriers,
}

impl WizardStep {
    /// All default steps in evaluation order.
    pub const ALL: [WizardStep; DEFAULT_STEP_COUNT] = [
        WizardStep::Address,
        WizardStep::Products,
        WizardStep::Payment,
        WizardStep::Carriers,
    ];

    /// Position of this step in the default plan.
    #[must_use]
    pub fn id(&self) -> StepId {
        match self {
            WizardStep::Address => StepId(1),
            WizardStep::Products => StepId(2),
            WizardStep::Payment => StepId(3),
            WizardStep::Carriers => StepId(4),
        }
    }

    /// The default step at `id`, if any.
    #[must_use]
    pub fn from_id(id: StepId) -> Option<WizardStep> {
        Self::ALL.into_iter().find(|step| step.id() == id)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Address => "Store address",
            WizardStep::Products => "Products",
            WizardStep::Payment => "Payment",
            WizardStep::Carriers => "Shipping carriers",
        }
    }

    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self {
            WizardStep::Address => StepKind::Address,
            WizardStep::Products => StepKind::Products,
            WizardStep::Payment => StepKind::Payment,
            WizardStep::Carriers => StepKind::Carriers,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id(), self.label())
    }
}

// =============================================================================
// STEP KINDS
// =============================================================================

/// One configurable step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// Store address. Always complete.
    Address,
    /// At least one enabled product.
    Products,
    /// Payment method. Always complete.
    Payment,
    /// At least one enabled carrier.
    Carriers,
    /// A configuration flag holding a truthy value.
    ConfigFlag {
        key: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl StepKind {
    /// Label shown for this step.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            StepKind::Address => WizardStep::Address.label().to_string(),
            StepKind::Products => WizardStep::Products.label().to_string(),
            StepKind::Payment => WizardStep::Payment.label().to_string(),
            StepKind::Carriers => WizardStep::Carriers.label().to_string(),
            StepKind::ConfigFlag { key, label } => label.clone().unwrap_or_else(|| key.clone()),
        }
    }
}

// =============================================================================
// PLAN
// =============================================================================

/// Ordered list of steps from which an evaluator is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardPlan {
    pub steps: Vec<StepKind>,
}

impl Default for WizardPlan {
    fn default() -> Self {
        Self {
            steps: WizardStep::ALL.iter().map(WizardStep::kind).collect(),
        }
    }
}

impl WizardPlan {
    #[must_use]
    pub fn new(steps: Vec<StepKind>) -> Self {
        Self { steps }
    }

    /// Reject plans the evaluator cannot run.
    pub fn validate(&self) -> Result<(), StoreSetupError> {
        if self.steps.len() > MAX_STEPS {
            return Err(StoreSetupError::InvalidInput(format!(
                "plan declares {} steps (maximum {})",
                self.steps.len(),
                MAX_STEPS
            )));
        }
        for step in &self.steps {
            if let StepKind::ConfigFlag { key, .. } = step {
                crate::catalog::validate_config_key(key)?;
            }
        }
        Ok(())
    }

    /// Build an evaluator from explicit oracles.
    ///
    /// Step ids follow plan order, starting at 1.
    pub fn build<'a, P, C, K>(
        &self,
        products: P,
        carriers: C,
        configuration: K,
    ) -> Result<StepCompletionEvaluator<'a>, StoreSetupError>
    where
        P: ProductExistenceOracle + Clone + 'a,
        C: CarrierExistenceOracle + Clone + 'a,
        K: ConfigurationOracle + Clone + 'a,
    {
        self.validate()?;

        let mut evaluator = StepCompletionEvaluator::new();
        for step in &self.steps {
            let label = step.label();
            evaluator = match step {
                StepKind::Address | StepKind::Payment => {
                    evaluator.with_step(AlwaysComplete::new(label))
                }
                StepKind::Products => {
                    evaluator.with_step(EnabledProducts::new(label, products.clone()))
                }
                StepKind::Carriers => {
                    evaluator.with_step(EnabledCarriers::new(label, carriers.clone()))
                }
                StepKind::ConfigFlag { key, .. } => {
                    evaluator.with_step(ConfigFlag::new(label, key.clone(), configuration.clone()))
                }
            };
        }

        tracing::debug!(steps = evaluator.len(), "wizard plan built");
        Ok(evaluator)
    }

    /// Build an evaluator backed by a catalog store's repositories.
    pub fn build_for_store<'a, S>(
        &self,
        store: &'a S,
    ) -> Result<StepCompletionEvaluator<'a>, StoreSetupError>
    where
        S: CatalogStore + ?Sized,
    {
        let repositories = Repositories::of(store);
        self.build(
            repositories.products,
            repositories.carriers,
            repositories.configuration,
        )
    }
}

/// The default four-step store-setup wizard over a catalog store.
pub fn store_setup_wizard<S>(store: &S) -> Result<StepCompletionEvaluator<'_>, StoreSetupError>
where
    S: CatalogStore + ?Sized,
{
    WizardPlan::default().build_for_store(store)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn default_plan_order() {
        let plan = WizardPlan::default();
        assert_eq!(
            plan.steps,
            vec![
                StepKind::Address,
                StepKind::Products,
                StepKind::Payment,
                StepKind::Carriers
            ]
        );
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_id(step.id()), Some(step));
        }
        assert_eq!(WizardStep::from_id(StepId(5)), None);
    }

    #[test]
    fn labels_follow_plan() {
        let catalog = MemoryCatalog::new();
        let evaluator = store_setup_wizard(&catalog).expect("build");
        assert_eq!(evaluator.len(), 4);
        assert_eq!(evaluator.label(StepId(4)).expect("label"), "Shipping carriers");
    }

    #[test]
    fn config_flag_step() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert_product("Mug", true).expect("insert");
        catalog.insert_carrier("Post", true).expect("insert");

        let mut plan = WizardPlan::default();
        plan.steps.push(StepKind::ConfigFlag {
            key: "store.legal_terms".into(),
            label: Some("Legal terms".into()),
        });

        {
            let evaluator = plan.build_for_store(&catalog).expect("build");
            assert_eq!(
                evaluator.next_incomplete_step().expect("next"),
                Some(StepId(5))
            );
            assert_eq!(evaluator.label(StepId(5)).expect("label"), "Legal terms");
        }

        catalog.set_config_value("store.legal_terms", "true").expect("set");
        let evaluator = plan.build_for_store(&catalog).expect("build");
        assert!(evaluator.is_finished().expect("finished"));
    }

    #[test]
    fn plan_rejects_empty_flag_key() {
        let plan = WizardPlan::new(vec![StepKind::ConfigFlag {
            key: String::new(),
            label: None,
        }]);
        assert!(matches!(
            plan.validate(),
            Err(StoreSetupError::InvalidInput(_))
        ));
    }

    #[test]
    fn plan_deserializes_from_tagged_steps() {
        let json = r#"{"steps":[{"kind":"products"},{"kind":"config_flag","key":"store.tax"}]}"#;
        let plan: WizardPlan = serde_json::from_str(json).expect("parse");
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].label(), "store.tax");
    }
}
