//! Wizard flows.
//!
//! A flow is data: an ordered list of steps and, for each step, the
//! selection fields it is allowed to write. `WizardState` holds the current
//! step and selection and replaces the selection wholesale on every update.
//! The quote calculator never sees any of this.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PricingPolicy;
use crate::pricing::calculators::{compute_quote, QuoteBreakdown};
use crate::pricing::models::PriceTable;
use crate::pricing::requests::{Selection, SelectionField, SelectionUpdate};
use crate::pricing::validation::{validate_entry, validate_step, ValidationIssue};

/// Every step any flow can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Welcome,
    Destination,
    WhereAndWhy,
    YachtType,
    DurationGuests,
    GuestsAndType,
    Dates,
    BudgetAndYacht,
    Package,
    Amenities,
    Contact,
    Quote,
}

/// One step of a flow and the fields it owns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepConfig {
    pub step: WizardStep,
    pub title: String,
    pub writes: Vec<SelectionField>,
}

impl StepConfig {
    pub fn new(step: WizardStep, title: &str, writes: &[SelectionField]) -> Self {
        Self {
            step,
            title: title.to_string(),
            writes: writes.to_vec(),
        }
    }

    pub fn may_write(&self, field: SelectionField) -> bool {
        self.writes.contains(&field)
    }
}

/// An ordered wizard flow. Always has at least one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowConfig {
    name: String,
    steps: Vec<StepConfig>,
}

impl FlowConfig {
    /// Build a custom flow
    pub fn new(name: &str, steps: Vec<StepConfig>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyFlow);
        }
        Ok(Self {
            name: name.to_string(),
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    /// Destination, yacht, duration slider, amenities, quote
    pub fn classic() -> Self {
        use SelectionField as F;
        use WizardStep as S;
        Self {
            name: "classic".to_string(),
            steps: vec![
                StepConfig::new(S::Destination, "Choose Destination", &[F::Destination]),
                StepConfig::new(S::YachtType, "Select Yacht Type", &[F::YachtType]),
                StepConfig::new(
                    S::DurationGuests,
                    "Duration & Guests",
                    &[F::Duration, F::Guests],
                ),
                StepConfig::new(S::Amenities, "Amenities", &[F::Amenities]),
                StepConfig::new(S::Quote, "Your Quote", &[F::Contact]),
            ],
        }
    }

    /// Guided broker flow with dates, budget, package and contact capture
    pub fn broker() -> Self {
        use SelectionField as F;
        use WizardStep as S;
        Self {
            name: "broker".to_string(),
            steps: vec![
                StepConfig::new(S::Welcome, "Welcome", &[F::HasChartered]),
                StepConfig::new(
                    S::WhereAndWhy,
                    "Where & Why",
                    &[F::Destination, F::Reasons],
                ),
                StepConfig::new(
                    S::GuestsAndType,
                    "Guests",
                    &[F::Guests, F::GuestTypes],
                ),
                StepConfig::new(S::Dates, "Dates", &[F::Dates, F::Duration]),
                StepConfig::new(
                    S::BudgetAndYacht,
                    "Budget & Yacht",
                    &[F::Budget, F::YachtType],
                ),
                StepConfig::new(S::Package, "Package", &[F::Bareboat]),
                StepConfig::new(S::Amenities, "Amenities", &[F::Amenities]),
                StepConfig::new(S::Contact, "Contact", &[F::Contact]),
                StepConfig::new(S::Quote, "Your Quote", &[]),
            ],
        }
    }

    /// Look up a preset by name
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "broker" => Some(Self::broker()),
            _ => None,
        }
    }
}

/// Navigation and update failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("step {step:?} cannot change {field:?}")]
    FieldNotWritable {
        step: WizardStep,
        field: SelectionField,
    },

    #[error("step {step:?} is not complete: {}", format_issues(.issues))]
    StepNotReady {
        step: WizardStep,
        issues: Vec<ValidationIssue>,
    },

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the last step")]
    AtLastStep,

    #[error("a flow needs at least one step")]
    EmptyFlow,
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Current position in a flow plus the selection so far
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    flow: FlowConfig,
    current: usize,
    selection: Selection,
}

impl WizardState {
    pub fn new(flow: FlowConfig, policy: &PricingPolicy) -> Self {
        Self {
            flow,
            current: 0,
            selection: Selection::with_duration(policy.default_duration_days),
        }
    }

    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> WizardStep {
        self.flow.steps[self.current].step
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.flow.steps.len()
    }

    /// Share of the flow reached, counting the current step
    pub fn progress_percent(&self) -> u8 {
        let total = self.flow.steps.len();
        (((self.current + 1) * 100) / total).min(100) as u8
    }

    /// Apply an update if the current step owns the field it writes
    pub fn apply(&self, update: SelectionUpdate) -> Result<WizardState, WizardError> {
        let step = &self.flow.steps[self.current];
        let field = update.field();
        if !step.may_write(field) {
            return Err(WizardError::FieldNotWritable {
                step: step.step,
                field,
            });
        }

        Ok(Self {
            flow: self.flow.clone(),
            current: self.current,
            selection: self.selection.apply(update),
        })
    }

    /// Move forward once the current step is complete and the next one reachable
    pub fn next(&self, table: &PriceTable, policy: &PricingPolicy) -> Result<WizardState, WizardError> {
        if self.is_last_step() {
            return Err(WizardError::AtLastStep);
        }

        let step = self.current_step();
        let issues = validate_step(&self.selection, step, table, policy);
        if !issues.is_empty() {
            return Err(WizardError::StepNotReady { step, issues });
        }

        let next_step = self.flow.steps[self.current + 1].step;
        let issues = validate_entry(&self.selection, next_step);
        if !issues.is_empty() {
            return Err(WizardError::StepNotReady {
                step: next_step,
                issues,
            });
        }

        debug!(flow = %self.flow.name, from = ?step, to = ?next_step, "Wizard advanced");
        Ok(Self {
            flow: self.flow.clone(),
            current: self.current + 1,
            selection: self.selection.clone(),
        })
    }

    pub fn previous(&self) -> Result<WizardState, WizardError> {
        if self.current == 0 {
            return Err(WizardError::AtFirstStep);
        }
        Ok(Self {
            flow: self.flow.clone(),
            current: self.current - 1,
            selection: self.selection.clone(),
        })
    }

    /// Live quote for the selection as it stands
    pub fn quote(&self, table: &PriceTable, policy: &PricingPolicy) -> QuoteBreakdown {
        compute_quote(&self.selection, table, policy)
    }
}
