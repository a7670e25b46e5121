//! # Store-Setup Wizard Scenarios
//!
//! End-to-end checks of the default four-step wizard:
//! 1 = address (always complete), 2 = products, 3 = payment (always complete),
//! 4 = carriers.

use std::cell::Cell;
use storesetup_core::{
    CarrierExistenceOracle, CatalogStore, ConfigurationOracle, MemoryCatalog,
    ProductExistenceOracle, StepId, Store, StoreSetupError, WizardPlan, WizardState, WizardStep,
    store_setup_wizard,
};

// =============================================================================
// FAKE COLLABORATORS
// =============================================================================

#[derive(Clone)]
struct Products(Result<bool, String>);

impl ProductExistenceOracle for Products {
    fn has_enabled_product(&self) -> Result<bool, StoreSetupError> {
        self.0.clone().map_err(StoreSetupError::Collaborator)
    }
}

#[derive(Clone)]
struct Carriers(bool);

impl CarrierExistenceOracle for Carriers {
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        Ok(self.0)
    }
}

#[derive(Clone)]
struct NoConfiguration;

impl ConfigurationOracle for NoConfiguration {
    fn value(&self, _key: &str) -> Result<Option<String>, StoreSetupError> {
        Ok(None)
    }
}

/// Counts queries so tests can confirm evaluation stays read-only and fresh.
struct CountingCarriers {
    calls: Cell<u32>,
    answer: bool,
}

impl CarrierExistenceOracle for CountingCarriers {
    fn has_enabled_carrier(&self) -> Result<bool, StoreSetupError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.answer)
    }
}

// =============================================================================
// SCENARIOS WITH FAKE ORACLES
// =============================================================================

mod with_oracles {
    use super::*;

    #[test]
    fn no_products_no_carriers_stops_at_products() {
        let evaluator = WizardPlan::default()
            .build(Products(Ok(false)), Carriers(false), NoConfiguration)
            .expect("build");

        assert_eq!(
            evaluator.next_incomplete_step().expect("next"),
            Some(WizardStep::Products.id())
        );
        assert!(!evaluator.is_finished().expect("finished"));
    }

    #[test]
    fn products_without_carriers_stops_at_carriers() {
        let evaluator = WizardPlan::default()
            .build(Products(Ok(true)), Carriers(false), NoConfiguration)
            .expect("build");

        assert_eq!(
            evaluator.next_incomplete_step().expect("next"),
            Some(StepId(4))
        );
        assert!(!evaluator.is_finished().expect("finished"));
    }

    #[test]
    fn products_and_carriers_finish_the_wizard() {
        let evaluator = WizardPlan::default()
            .build(Products(Ok(true)), Carriers(true), NoConfiguration)
            .expect("build");

        assert_eq!(evaluator.next_incomplete_step().expect("next"), None);
        assert!(evaluator.is_finished().expect("finished"));
        assert_eq!(evaluator.state().expect("state"), WizardState::Finished);
    }

    #[test]
    fn product_query_failure_propagates() {
        let evaluator = WizardPlan::default()
            .build(
                Products(Err("database unavailable".into())),
                Carriers(true),
                NoConfiguration,
            )
            .expect("build");

        match evaluator.next_incomplete_step() {
            Err(StoreSetupError::Collaborator(message)) => {
                assert_eq!(message, "database unavailable");
            }
            other => unreachable!("expected collaborator failure, got {:?}", other),
        }
        assert!(evaluator.is_finished().is_err());
        assert!(evaluator.evaluate_all().is_err());
    }

    #[test]
    fn carriers_satisfied_does_not_skip_missing_products() {
        let evaluator = WizardPlan::default()
            .build(Products(Ok(false)), Carriers(true), NoConfiguration)
            .expect("build");

        let status = evaluator.evaluate_all().expect("evaluate");
        assert_eq!(status.get(&StepId(4)), Some(&true));
        assert_eq!(
            evaluator.next_incomplete_step().expect("next"),
            Some(StepId(2))
        );
    }

    #[test]
    fn evaluate_all_covers_exactly_the_configured_steps() {
        let evaluator = WizardPlan::default()
            .build(Products(Ok(false)), Carriers(false), NoConfiguration)
            .expect("build");

        let status = evaluator.evaluate_all().expect("evaluate");
        let ids: Vec<_> = status.keys().copied().collect();
        assert_eq!(ids, vec![StepId(1), StepId(2), StepId(3), StepId(4)]);

        // Address and payment are stubs.
        assert!(status[&StepId(1)]);
        assert!(status[&StepId(3)]);
    }

    #[test]
    fn repeated_calls_query_fresh_and_agree() {
        let carriers = CountingCarriers {
            calls: Cell::new(0),
            answer: false,
        };
        let evaluator = WizardPlan::default()
            .build(Products(Ok(true)), &carriers, NoConfiguration)
            .expect("build");

        let first = evaluator.next_incomplete_step().expect("next");
        let second = evaluator.next_incomplete_step().expect("next");

        assert_eq!(first, second);
        assert_eq!(carriers.calls.get(), 2);
    }
}

// =============================================================================
// SCENARIOS WITH REAL CATALOGS
// =============================================================================

mod with_catalog {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn wizard_progresses_as_catalog_fills() {
        let mut catalog = MemoryCatalog::new();

        let next = |catalog: &MemoryCatalog| {
            store_setup_wizard(catalog)
                .expect("build")
                .next_incomplete_step()
                .expect("next")
        };

        assert_eq!(next(&catalog), Some(StepId(2)));

        let product = catalog.insert_product("Mug", false).expect("insert");
        assert_eq!(next(&catalog), Some(StepId(2)), "disabled products do not count");

        catalog.set_product_enabled(product, true).expect("enable");
        assert_eq!(next(&catalog), Some(StepId(4)));

        catalog.insert_carrier("Post", true).expect("insert");
        assert_eq!(next(&catalog), None);
    }

    #[test]
    fn redb_store_report() {
        let temp = tempdir().expect("temp dir");
        let mut store = Store::with_redb(temp.path().join("wizard.redb")).expect("open");
        store.insert_product("Mug", true).expect("insert");

        let report = store_setup_wizard(&store)
            .expect("build")
            .report()
            .expect("report");

        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.next_step, Some(StepId(4)));
        assert!(!report.finished);
        assert_eq!(report.completed(), 3);
        assert_eq!(report.steps[3].label, WizardStep::Carriers.label());
    }

    #[test]
    fn disabling_the_only_carrier_reopens_the_step() {
        let mut store = Store::new();
        store.insert_product("Mug", true).expect("insert");
        let carrier = store.insert_carrier("Post", true).expect("insert");
        assert!(store_setup_wizard(&store)
            .expect("build")
            .is_finished()
            .expect("finished"));

        store.set_carrier_enabled(carrier, false).expect("disable");
        assert_eq!(
            store_setup_wizard(&store)
                .expect("build")
                .state()
                .expect("state"),
            WizardState::InProgress(StepId(4))
        );
    }
}
