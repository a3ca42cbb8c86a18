//! Selection snapshot and request DTOs for pricing API endpoints.
//!
//! A `Selection` is an immutable value. Wizard steps never patch it in place;
//! they describe a change as a `SelectionUpdate` and `Selection::apply`
//! returns the next snapshot.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::leads::Consultation;

/// Destination snapshot carried by a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub region: String,
    pub base_price_weekly: Decimal,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// Yacht type snapshot carried by a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YachtType {
    pub id: String,
    pub name: String,
    pub price_multiplier: Decimal,
    pub capacity: i32,
}

/// Budget the customer is willing to spend (display only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// How the customer wants the broker to get in touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    #[default]
    Email,
    Call,
    Message,
}

/// Lead capture fields. The calculator never looks at these.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub contact_method: ContactMethod,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub special_requests: String,
}

impl ContactDetails {
    /// True when the broker has at least one way to reach the customer
    pub fn is_reachable(&self) -> bool {
        !self.email.trim().is_empty() || !self.phone.trim().is_empty()
    }
}

fn default_guests() -> i32 {
    4
}

fn default_duration_days() -> i32 {
    7
}

/// Everything the customer has chosen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default)]
    pub yacht_type: Option<YachtType>,
    #[serde(default = "default_guests")]
    pub guests: i32,
    #[serde(default = "default_duration_days")]
    pub duration_days: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_bareboat_charter: bool,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub contact_details: Option<ContactDetails>,
    #[serde(default)]
    pub has_chartered: Option<bool>,
    #[serde(default)]
    pub guest_types: Vec<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::with_duration(default_duration_days())
    }
}

/// Fields a wizard step may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    Destination,
    YachtType,
    Guests,
    Duration,
    Dates,
    Bareboat,
    Amenities,
    Budget,
    Contact,
    GuestTypes,
    Reasons,
    HasChartered,
}

/// A single change produced by a wizard step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SelectionUpdate {
    Destination(Option<Destination>),
    YachtType(Option<YachtType>),
    Guests(i32),
    Duration(i32),
    /// Explicit start and end dates; the duration follows from them
    Dates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// A start date plus a night count; the end date follows from them
    StartAndNights { start: NaiveDate, nights: i32 },
    Bareboat(bool),
    ToggleAmenity(String),
    Amenities(BTreeSet<String>),
    Budget(Option<BudgetRange>),
    Contact(Option<ContactDetails>),
    GuestTypes(Vec<String>),
    Reasons(Vec<String>),
    HasChartered(Option<bool>),
}

impl SelectionUpdate {
    /// The selection field this update writes
    pub fn field(&self) -> SelectionField {
        match self {
            SelectionUpdate::Destination(_) => SelectionField::Destination,
            SelectionUpdate::YachtType(_) => SelectionField::YachtType,
            SelectionUpdate::Guests(_) => SelectionField::Guests,
            SelectionUpdate::Duration(_) => SelectionField::Duration,
            SelectionUpdate::Dates { .. } | SelectionUpdate::StartAndNights { .. } => {
                SelectionField::Dates
            }
            SelectionUpdate::Bareboat(_) => SelectionField::Bareboat,
            SelectionUpdate::ToggleAmenity(_) | SelectionUpdate::Amenities(_) => {
                SelectionField::Amenities
            }
            SelectionUpdate::Budget(_) => SelectionField::Budget,
            SelectionUpdate::Contact(_) => SelectionField::Contact,
            SelectionUpdate::GuestTypes(_) => SelectionField::GuestTypes,
            SelectionUpdate::Reasons(_) => SelectionField::Reasons,
            SelectionUpdate::HasChartered(_) => SelectionField::HasChartered,
        }
    }
}

impl Selection {
    /// Empty selection starting at the given duration
    pub fn with_duration(duration_days: i32) -> Self {
        Self {
            destination: None,
            yacht_type: None,
            guests: default_guests(),
            duration_days,
            start_date: None,
            end_date: None,
            is_bareboat_charter: false,
            amenities: BTreeSet::new(),
            budget_range: None,
            contact_details: None,
            has_chartered: None,
            guest_types: Vec::new(),
            reasons: Vec::new(),
        }
    }

    /// True once both charter dates are chosen
    pub fn uses_dates(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Whole days between the chosen dates, if both are set
    pub fn nights_between_dates(&self) -> Option<i32> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(days_to_i32((end - start).num_days())),
            _ => None,
        }
    }

    /// Copy with `duration_days` re-derived from the dates when both are set.
    ///
    /// Selections that arrive over the wire may carry a stale duration.
    pub fn normalized(&self) -> Selection {
        let mut next = self.clone();
        if let Some(nights) = self.nights_between_dates() {
            next.duration_days = nights;
        }
        next
    }

    /// Produce the next snapshot with `update` applied
    pub fn apply(&self, update: SelectionUpdate) -> Selection {
        let mut next = self.clone();
        match update {
            SelectionUpdate::Destination(destination) => next.destination = destination,
            SelectionUpdate::YachtType(yacht_type) => next.yacht_type = yacht_type,
            SelectionUpdate::Guests(guests) => next.guests = guests,
            SelectionUpdate::Duration(days) => {
                next.duration_days = days;
                if let Some(start) = next.start_date {
                    next.end_date = add_days(start, days);
                }
            }
            SelectionUpdate::Dates { start, end } => {
                next.start_date = start;
                next.end_date = end;
                if let Some(nights) = next.nights_between_dates() {
                    next.duration_days = nights;
                }
            }
            SelectionUpdate::StartAndNights { start, nights } => {
                next.start_date = Some(start);
                next.end_date = add_days(start, nights);
                next.duration_days = nights;
            }
            SelectionUpdate::Bareboat(flag) => next.is_bareboat_charter = flag,
            SelectionUpdate::ToggleAmenity(id) => {
                if !next.amenities.remove(&id) {
                    next.amenities.insert(id);
                }
            }
            SelectionUpdate::Amenities(ids) => next.amenities = ids,
            SelectionUpdate::Budget(range) => next.budget_range = range,
            SelectionUpdate::Contact(details) => next.contact_details = details,
            SelectionUpdate::GuestTypes(types) => next.guest_types = types,
            SelectionUpdate::Reasons(reasons) => next.reasons = reasons,
            SelectionUpdate::HasChartered(flag) => next.has_chartered = flag,
        }
        next
    }
}

fn add_days(start: NaiveDate, days: i32) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::days(i64::from(days)))
}

fn days_to_i32(days: i64) -> i32 {
    days.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Request to build and submit a lead
#[derive(Debug, Deserialize)]
pub struct SubmitLeadRequest {
    pub selection: Selection,
    #[serde(default)]
    pub consultation: Consultation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_selection_matches_wizard_start() {
        let selection = Selection::default();
        assert!(selection.destination.is_none());
        assert!(selection.yacht_type.is_none());
        assert_eq!(selection.guests, 4);
        assert_eq!(selection.duration_days, 7);
        assert!(selection.amenities.is_empty());
        assert!(!selection.is_bareboat_charter);
    }

    #[test]
    fn test_apply_returns_new_value_and_leaves_original() {
        let original = Selection::default();
        let next = original.apply(SelectionUpdate::Guests(6));
        assert_eq!(next.guests, 6);
        assert_eq!(original.guests, 4);
    }

    #[test]
    fn test_dates_update_derives_duration() {
        let next = Selection::default().apply(SelectionUpdate::Dates {
            start: Some(date(2026, 7, 1)),
            end: Some(date(2026, 7, 11)),
        });
        assert_eq!(next.duration_days, 10);
        assert!(next.uses_dates());
    }

    #[test]
    fn test_partial_dates_keep_duration() {
        let next = Selection::default().apply(SelectionUpdate::Dates {
            start: Some(date(2026, 7, 1)),
            end: None,
        });
        assert_eq!(next.duration_days, 7);
        assert!(!next.uses_dates());
    }

    #[test]
    fn test_start_and_nights_derives_end_date() {
        let next = Selection::default().apply(SelectionUpdate::StartAndNights {
            start: date(2026, 8, 28),
            nights: 5,
        });
        assert_eq!(next.end_date, Some(date(2026, 9, 2)));
        assert_eq!(next.duration_days, 5);
    }

    #[test]
    fn test_duration_update_moves_end_date_when_start_set() {
        let next = Selection::default()
            .apply(SelectionUpdate::StartAndNights {
                start: date(2026, 6, 1),
                nights: 7,
            })
            .apply(SelectionUpdate::Duration(14));
        assert_eq!(next.end_date, Some(date(2026, 6, 15)));
        assert_eq!(next.nights_between_dates(), Some(14));
    }

    #[test]
    fn test_toggle_amenity_adds_then_removes() {
        let with_chef = Selection::default().apply(SelectionUpdate::ToggleAmenity("chef".into()));
        assert!(with_chef.amenities.contains("chef"));

        let without = with_chef.apply(SelectionUpdate::ToggleAmenity("chef".into()));
        assert!(without.amenities.is_empty());
    }

    #[test]
    fn test_normalized_fixes_stale_duration() {
        let mut selection = Selection::default();
        selection.start_date = Some(date(2026, 5, 1));
        selection.end_date = Some(date(2026, 5, 4));
        selection.duration_days = 7;

        assert_eq!(selection.normalized().duration_days, 3);
    }

    #[test]
    fn test_update_field_mapping() {
        assert_eq!(
            SelectionUpdate::ToggleAmenity("wifi".into()).field(),
            SelectionField::Amenities
        );
        assert_eq!(
            SelectionUpdate::StartAndNights {
                start: date(2026, 1, 1),
                nights: 7
            }
            .field(),
            SelectionField::Dates
        );
        assert_eq!(SelectionUpdate::Bareboat(true).field(), SelectionField::Bareboat);
    }

    #[test]
    fn test_deserialize_partial_selection_uses_defaults() {
        let selection: Selection = serde_json::from_str(
            r#"{
                "destination": { "name": "Mediterranean", "region": "Mediterranean", "base_price_weekly": 15000 },
                "amenities": ["wifi", "chef", "wifi"]
            }"#,
        )
        .unwrap();

        assert_eq!(selection.guests, 4);
        assert_eq!(selection.duration_days, 7);
        assert_eq!(selection.amenities.len(), 2);
        assert_eq!(
            selection.destination.unwrap().base_price_weekly,
            dec!(15000)
        );
    }

    #[test]
    fn test_contact_reachable_with_email_or_phone() {
        let mut contact = ContactDetails::default();
        assert!(!contact.is_reachable());
        contact.phone = "+30 210 000 0000".into();
        assert!(contact.is_reachable());
    }
}
