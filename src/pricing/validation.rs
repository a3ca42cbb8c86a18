//! Selection readiness checks.
//!
//! The calculator prices anything; this module decides whether a selection
//! is complete and sensible enough to move on. Issues are values, not
//! errors: the wizard shows them to the customer and disables "Next".

use rust_decimal::Decimal;

use crate::config::PricingPolicy;
use crate::pricing::models::PriceTable;
use crate::pricing::requests::Selection;
use crate::wizard::WizardStep;

/// Why a selection is not ready
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("destination missing")]
    DestinationMissing,

    #[error("yacht type missing")]
    YachtTypeMissing,

    #[error("charter dates missing")]
    DatesMissing,

    #[error("end date is before start date")]
    EndBeforeStart,

    #[error("duration of {actual} nights is below the {min}-night minimum")]
    DurationTooShort { min: i32, actual: i32 },

    #[error("at least one guest is required")]
    NoGuests,

    #[error("capacity exceeded: {guests} guests for a yacht that sleeps {capacity}")]
    CapacityExceeded { guests: i32, capacity: i32 },

    #[error("budget minimum {min} is above maximum {max}")]
    BudgetInverted { min: Decimal, max: Decimal },

    #[error("budget cannot be negative")]
    BudgetNegative,

    #[error("unknown amenity '{0}'")]
    UnknownAmenity(String),

    #[error("contact email or phone missing")]
    ContactMissing,
}

impl ValidationIssue {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::DestinationMissing => "destination_missing",
            ValidationIssue::YachtTypeMissing => "yacht_type_missing",
            ValidationIssue::DatesMissing => "dates_missing",
            ValidationIssue::EndBeforeStart => "end_before_start",
            ValidationIssue::DurationTooShort { .. } => "duration_too_short",
            ValidationIssue::NoGuests => "no_guests",
            ValidationIssue::CapacityExceeded { .. } => "capacity_exceeded",
            ValidationIssue::BudgetInverted { .. } => "budget_inverted",
            ValidationIssue::BudgetNegative => "budget_negative",
            ValidationIssue::UnknownAmenity(_) => "unknown_amenity",
            ValidationIssue::ContactMissing => "contact_missing",
        }
    }
}

/// Result of validating a selection
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Ready,
    NotReady(Vec<ValidationIssue>),
}

impl Readiness {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        if issues.is_empty() {
            Readiness::Ready
        } else {
            Readiness::NotReady(issues)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Readiness::Ready => &[],
            Readiness::NotReady(issues) => issues,
        }
    }
}

/// Check a selection is complete enough to quote and hand to a broker
pub fn validate(selection: &Selection, table: &PriceTable, policy: &PricingPolicy) -> Readiness {
    let mut issues = Vec::new();

    if selection.destination.is_none() {
        issues.push(ValidationIssue::DestinationMissing);
    }
    if selection.yacht_type.is_none() {
        issues.push(ValidationIssue::YachtTypeMissing);
    }
    check_duration(selection, policy, &mut issues);
    check_guests(selection, &mut issues);
    check_budget(selection, &mut issues);
    check_amenities(selection, table, &mut issues);

    Readiness::from_issues(issues)
}

/// Issues that keep the customer from leaving `step`
pub fn validate_step(
    selection: &Selection,
    step: WizardStep,
    table: &PriceTable,
    policy: &PricingPolicy,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match step {
        WizardStep::Welcome | WizardStep::Package | WizardStep::Quote => {}
        WizardStep::Destination | WizardStep::WhereAndWhy => {
            if selection.destination.is_none() {
                issues.push(ValidationIssue::DestinationMissing);
            }
        }
        WizardStep::YachtType => {
            if selection.yacht_type.is_none() {
                issues.push(ValidationIssue::YachtTypeMissing);
            }
        }
        WizardStep::DurationGuests => {
            issues.extend(validate_entry(selection, step));
            check_duration(selection, policy, &mut issues);
            check_guests(selection, &mut issues);
        }
        WizardStep::GuestsAndType => {
            if selection.guests < 1 {
                issues.push(ValidationIssue::NoGuests);
            }
        }
        WizardStep::Dates => {
            if !selection.uses_dates() {
                issues.push(ValidationIssue::DatesMissing);
            }
            check_duration(selection, policy, &mut issues);
        }
        WizardStep::BudgetAndYacht => {
            if selection.yacht_type.is_none() {
                issues.push(ValidationIssue::YachtTypeMissing);
            }
            check_guests(selection, &mut issues);
            check_budget(selection, &mut issues);
        }
        WizardStep::Amenities => check_amenities(selection, table, &mut issues),
        WizardStep::Contact => {
            let reachable = selection
                .contact_details
                .as_ref()
                .is_some_and(|c| c.is_reachable());
            if !reachable {
                issues.push(ValidationIssue::ContactMissing);
            }
        }
    }

    issues
}

/// Issues that keep `step` from being reachable at all
pub fn validate_entry(selection: &Selection, step: WizardStep) -> Vec<ValidationIssue> {
    match step {
        // Guest limits depend on the yacht's capacity.
        WizardStep::DurationGuests if selection.yacht_type.is_none() => {
            vec![ValidationIssue::YachtTypeMissing]
        }
        _ => Vec::new(),
    }
}

fn check_duration(selection: &Selection, policy: &PricingPolicy, issues: &mut Vec<ValidationIssue>) {
    let (min, actual) = match selection.nights_between_dates() {
        Some(nights) if nights < 0 => {
            issues.push(ValidationIssue::EndBeforeStart);
            return;
        }
        Some(nights) => (policy.min_nights_with_dates, nights),
        None => (policy.min_duration_days, selection.duration_days),
    };

    if actual < min {
        issues.push(ValidationIssue::DurationTooShort { min, actual });
    }
}

fn check_guests(selection: &Selection, issues: &mut Vec<ValidationIssue>) {
    if selection.guests < 1 {
        issues.push(ValidationIssue::NoGuests);
        return;
    }
    if let Some(yacht) = &selection.yacht_type {
        if selection.guests > yacht.capacity {
            issues.push(ValidationIssue::CapacityExceeded {
                guests: selection.guests,
                capacity: yacht.capacity,
            });
        }
    }
}

fn check_budget(selection: &Selection, issues: &mut Vec<ValidationIssue>) {
    if let Some(budget) = selection.budget_range {
        if budget.min < Decimal::ZERO || budget.max < Decimal::ZERO {
            issues.push(ValidationIssue::BudgetNegative);
        }
        if budget.min > budget.max {
            issues.push(ValidationIssue::BudgetInverted {
                min: budget.min,
                max: budget.max,
            });
        }
    }
}

fn check_amenities(selection: &Selection, table: &PriceTable, issues: &mut Vec<ValidationIssue>) {
    for id in &selection.amenities {
        if table.amenity(id).is_none() {
            issues.push(ValidationIssue::UnknownAmenity(id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::requests::{BudgetRange, ContactDetails, SelectionUpdate};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn table() -> &'static PriceTable {
        PriceTable::standard()
    }

    fn complete() -> Selection {
        let t = table();
        Selection::default()
            .apply(SelectionUpdate::Destination(Some(
                t.destination("mediterranean").unwrap().to_selection(),
            )))
            .apply(SelectionUpdate::YachtType(Some(
                t.yacht("catamaran").unwrap().to_selection(),
            )))
    }

    fn with_nights(nights: i32) -> Selection {
        complete().apply(SelectionUpdate::StartAndNights {
            start: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            nights,
        })
    }

    fn check(selection: &Selection) -> Readiness {
        validate(selection, table(), &PricingPolicy::default())
    }

    #[test]
    fn test_complete_selection_is_ready() {
        assert_eq!(check(&complete()), Readiness::Ready);
    }

    #[test]
    fn test_missing_destination_and_yacht_reported() {
        let readiness = check(&Selection::default());
        assert!(!readiness.is_ready());
        assert_eq!(
            readiness.issues(),
            &[
                ValidationIssue::DestinationMissing,
                ValidationIssue::YachtTypeMissing
            ]
        );
        assert_eq!(readiness.issues()[0].to_string(), "destination missing");
    }

    #[test]
    fn test_three_nights_rejected_under_date_policy() {
        let readiness = check(&with_nights(3));
        assert_eq!(
            readiness.issues(),
            &[ValidationIssue::DurationTooShort { min: 5, actual: 3 }]
        );
    }

    #[test]
    fn test_five_nights_accepted_under_date_policy() {
        assert!(check(&with_nights(5)).is_ready());
    }

    #[test]
    fn test_slider_flow_allows_single_day() {
        let selection = complete().apply(SelectionUpdate::Duration(1));
        assert!(check(&selection).is_ready());

        let zero = complete().apply(SelectionUpdate::Duration(0));
        assert_eq!(
            check(&zero).issues(),
            &[ValidationIssue::DurationTooShort { min: 1, actual: 0 }]
        );
    }

    #[test]
    fn test_end_before_start_reported_once() {
        let selection = complete().apply(SelectionUpdate::Dates {
            start: NaiveDate::from_ymd_opt(2026, 6, 10),
            end: NaiveDate::from_ymd_opt(2026, 6, 1),
        });
        assert_eq!(check(&selection).issues(), &[ValidationIssue::EndBeforeStart]);
    }

    #[test]
    fn test_capacity_exceeded_is_flagged_not_clamped() {
        let selection = complete().apply(SelectionUpdate::Guests(11));
        assert_eq!(
            check(&selection).issues(),
            &[ValidationIssue::CapacityExceeded {
                guests: 11,
                capacity: 10
            }]
        );
        assert_eq!(selection.guests, 11);
    }

    #[test]
    fn test_zero_guests_rejected() {
        let selection = complete().apply(SelectionUpdate::Guests(0));
        assert_eq!(check(&selection).issues(), &[ValidationIssue::NoGuests]);
    }

    #[test]
    fn test_budget_rules() {
        let inverted = complete().apply(SelectionUpdate::Budget(Some(BudgetRange {
            min: dec!(50000),
            max: dec!(20000),
        })));
        assert_eq!(
            check(&inverted).issues(),
            &[ValidationIssue::BudgetInverted {
                min: dec!(50000),
                max: dec!(20000)
            }]
        );

        let negative = complete().apply(SelectionUpdate::Budget(Some(BudgetRange {
            min: dec!(-1),
            max: dec!(20000),
        })));
        assert_eq!(check(&negative).issues(), &[ValidationIssue::BudgetNegative]);
    }

    #[test]
    fn test_unknown_amenity_reported() {
        let selection = complete().apply(SelectionUpdate::ToggleAmenity("submarine".into()));
        assert_eq!(
            check(&selection).issues(),
            &[ValidationIssue::UnknownAmenity("submarine".into())]
        );
    }

    #[test]
    fn test_policy_minimum_is_configurable() {
        let policy = PricingPolicy {
            min_nights_with_dates: 7,
            ..PricingPolicy::default()
        };
        let readiness = validate(&with_nights(5), table(), &policy);
        assert_eq!(
            readiness.issues(),
            &[ValidationIssue::DurationTooShort { min: 7, actual: 5 }]
        );
    }

    // ==================== step gating ====================

    #[test]
    fn test_duration_step_requires_yacht() {
        let selection = Selection::default();
        assert_eq!(
            validate_entry(&selection, WizardStep::DurationGuests),
            vec![ValidationIssue::YachtTypeMissing]
        );
        assert!(validate_entry(&complete(), WizardStep::DurationGuests).is_empty());
    }

    #[test]
    fn test_dates_step_requires_both_dates() {
        let issues = validate_step(
            &complete(),
            WizardStep::Dates,
            table(),
            &PricingPolicy::default(),
        );
        assert_eq!(issues, vec![ValidationIssue::DatesMissing]);

        let issues = validate_step(
            &with_nights(7),
            WizardStep::Dates,
            table(),
            &PricingPolicy::default(),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_contact_step_requires_reachable_contact() {
        let policy = PricingPolicy::default();
        let issues = validate_step(&complete(), WizardStep::Contact, table(), &policy);
        assert_eq!(issues, vec![ValidationIssue::ContactMissing]);

        let contact = ContactDetails {
            email: "guest@example.com".into(),
            ..ContactDetails::default()
        };
        let selection = complete().apply(SelectionUpdate::Contact(Some(contact)));
        assert!(validate_step(&selection, WizardStep::Contact, table(), &policy).is_empty());
    }

    #[test]
    fn test_issue_codes_are_stable() {
        assert_eq!(
            ValidationIssue::CapacityExceeded {
                guests: 1,
                capacity: 0
            }
            .code(),
            "capacity_exceeded"
        );
        assert_eq!(ValidationIssue::DatesMissing.code(), "dates_missing");
    }
}
