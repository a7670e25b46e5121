//! # Step Completion Evaluator
//!
//! Determines setup progress from an ordered registry of completion checks.
//!
//! ## Policy
//!
//! Completion means "no gaps": steps are scanned in ascending id order and the
//! first incomplete step is reported, even if later steps are already
//! satisfied. An evaluator with no steps is finished.
//!
//! ## Failure Semantics
//!
//! Every call evaluates all configured checks. If any check fails, the whole
//! call fails with that error; no partial result is returned and nothing is
//! retried.

use crate::check::CompletionCheck;
use crate::{StepId, StoreSetupError, WizardState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion status of every configured step, keyed by id.
pub type StepStatusMap = BTreeMap<StepId, bool>;

// =============================================================================
// EVALUATOR
// =============================================================================

/// Ordered registry of `(StepId, CompletionCheck)` pairs.
///
/// Holds no state besides its checks; every query is computed fresh.
#[derive(Default)]
pub struct StepCompletionEvaluator<'a> {
    steps: BTreeMap<StepId, Box<dyn CompletionCheck + 'a>>,
}

impl std::fmt::Debug for StepCompletionEvaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<(u32, &str)> = self
            .steps
            .iter()
            .map(|(id, check)| (id.value(), check.label()))
            .collect();
        f.debug_struct("StepCompletionEvaluator")
            .field("steps", &labels)
            .finish()
    }
}

impl<'a> StepCompletionEvaluator<'a> {
    /// Create an evaluator with no steps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check as the next step (`len + 1`).
    #[must_use]
    pub fn with_step(mut self, check: impl CompletionCheck + 'a) -> Self {
        let id = StepId(self.steps.len() as u32).next();
        self.steps.insert(id, Box::new(check));
        self
    }

    /// Build an evaluator from explicit `(id, check)` pairs in any order.
    ///
    /// # Errors
    ///
    /// - `InvalidStepId` for id 0
    /// - `DuplicateStep` if an id appears twice
    /// - `StepGap` if the ids are not `1..=N`
    pub fn from_steps(
        pairs: Vec<(StepId, Box<dyn CompletionCheck + 'a>)>,
    ) -> Result<Self, StoreSetupError> {
        let mut steps = BTreeMap::new();

        for (id, check) in pairs {
            if id.value() == 0 {
                return Err(StoreSetupError::InvalidStepId(id));
            }
            if steps.insert(id, check).is_some() {
                return Err(StoreSetupError::DuplicateStep(id));
            }
        }

        let mut expected = StepId::FIRST;
        for &found in steps.keys() {
            if found != expected {
                return Err(StoreSetupError::StepGap { expected, found });
            }
            expected = expected.next();
        }

        Ok(Self { steps })
    }

    /// Number of configured steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Configured step ids in ascending order.
    pub fn step_ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.keys().copied()
    }

    /// Label of a configured step.
    pub fn label(&self, step: StepId) -> Result<&str, StoreSetupError> {
        self.steps
            .get(&step)
            .map(|check| check.label())
            .ok_or(StoreSetupError::StepNotFound(step))
    }

    /// Evaluate every configured check.
    ///
    /// Returns exactly one entry per configured id.
    pub fn evaluate_all(&self) -> Result<StepStatusMap, StoreSetupError> {
        let mut status = BTreeMap::new();
        for (&id, check) in &self.steps {
            let complete = check.is_complete().inspect_err(|e| {
                tracing::debug!(
                    step = id.value(),
                    label = check.label(),
                    error = %e,
                    "step check failed"
                );
            })?;
            tracing::trace!(step = id.value(), label = check.label(), complete, "step evaluated");
            status.insert(id, complete);
        }
        Ok(status)
    }

    /// Smallest step id whose check is not complete, `None` when finished.
    pub fn next_incomplete_step(&self) -> Result<Option<StepId>, StoreSetupError> {
        let status = self.evaluate_all()?;
        Ok(first_incomplete(&status))
    }

    /// True when every configured step is complete.
    pub fn is_finished(&self) -> Result<bool, StoreSetupError> {
        Ok(self.next_incomplete_step()?.is_none())
    }

    /// Derived wizard state.
    pub fn state(&self) -> Result<WizardState, StoreSetupError> {
        let state = WizardState::from_next_step(self.next_incomplete_step()?);
        tracing::debug!(?state, steps = self.steps.len(), "wizard state evaluated");
        Ok(state)
    }

    /// Evaluate a single configured step.
    ///
    /// # Errors
    ///
    /// `StepNotFound` if `step` is not configured.
    pub fn step_status(&self, step: StepId) -> Result<bool, StoreSetupError> {
        self.steps
            .get(&step)
            .ok_or(StoreSetupError::StepNotFound(step))?
            .is_complete()
    }

    /// Evaluate all steps once and describe the outcome.
    pub fn report(&self) -> Result<WizardReport, StoreSetupError> {
        let status = self.evaluate_all()?;
        let next_step = first_incomplete(&status);

        let steps = self
            .steps
            .iter()
            .map(|(&id, check)| StepReport {
                id,
                label: check.label().to_string(),
                complete: status.get(&id).copied().unwrap_or(false),
            })
            .collect();

        Ok(WizardReport {
            steps,
            next_step,
            finished: next_step.is_none(),
        })
    }
}

/// Scan a status map in ascending id order for the first `false`.
#[must_use]
pub fn first_incomplete(status: &StepStatusMap) -> Option<StepId> {
    status
        .iter()
        .find(|(_, complete)| !**complete)
        .map(|(&id, _)| id)
}

// =============================================================================
// REPORT
// =============================================================================

/// Completion status of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub id: StepId,
    pub label: String,
    pub complete: bool,
}

/// Snapshot of a whole wizard, produced from a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardReport {
    pub steps: Vec<StepReport>,
    pub next_step: Option<StepId>,
    pub finished: bool,
}

impl WizardReport {
    #[must_use]
    pub fn state(&self) -> WizardState {
        WizardState::from_next_step(self.next_step)
    }

    /// Number of completed steps.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.steps.iter().filter(|s| s.complete).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
