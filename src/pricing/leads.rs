//! Lead capture records.
//!
//! At the end of the wizard the selection is flattened into a write-only
//! record for the brokerage's submissions table. Storing it and notifying a
//! broker happen elsewhere, behind the `LeadSink` seam.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::pricing::calculators::QuoteBreakdown;
use crate::pricing::requests::{ContactMethod, Selection};

/// Consultation time windows offered by brokers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// 9:00 - 11:00
    Morning,
    /// 12:00 - 14:00
    Midday,
    /// 18:00 - 20:00
    Evening,
}

impl TimeSlot {
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning (9:00 - 11:00 AM)",
            TimeSlot::Midday => "Midday (12:00 - 2:00 PM)",
            TimeSlot::Evening => "Evening (6:00 - 8:00 PM)",
        }
    }
}

/// Broker consultation request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Consultation {
    pub requested: bool,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<TimeSlot>,
}

/// Reasons a lead cannot be built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LeadError {
    #[error("contact details with an email or phone number are required")]
    MissingContact,

    #[error("consultation requested without an appointment date")]
    MissingAppointment,

    #[error("lead sink rejected the submission: {0}")]
    Sink(String),
}

/// Flattened submission record, one per completed wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    pub id: Uuid,
    pub destination_name: Option<String>,
    pub destination_region: Option<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub destination_base_price: Option<Decimal>,
    pub destination_countries: Vec<String>,
    pub yacht_id: Option<String>,
    pub yacht_name: Option<String>,
    pub yacht_capacity: Option<i32>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub yacht_price_multiplier: Option<Decimal>,
    pub guests: i32,
    pub guest_types: Vec<String>,
    pub reasons: Vec<String>,
    pub has_chartered: Option<bool>,
    pub duration: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_bareboat_charter: bool,
    pub amenities: Vec<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub budget_min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub budget_max: Option<Decimal>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_method: ContactMethod,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub special_requests: Option<String>,
    pub consultation_requested: bool,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<TimeSlot>,
    #[serde(with = "rust_decimal::serde::str")]
    pub estimated_total: Decimal,
    pub submitted_at: DateTime<Utc>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl LeadRecord {
    /// Build the record for a finished selection and its quote
    pub fn from_selection(
        selection: &Selection,
        quote: &QuoteBreakdown,
        consultation: &Consultation,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, LeadError> {
        let contact = selection
            .contact_details
            .as_ref()
            .filter(|c| c.is_reachable())
            .ok_or(LeadError::MissingContact)?;

        if consultation.requested && consultation.appointment_date.is_none() {
            return Err(LeadError::MissingAppointment);
        }

        let destination = selection.destination.as_ref();
        let yacht = selection.yacht_type.as_ref();

        Ok(Self {
            id: Uuid::new_v4(),
            destination_name: destination.map(|d| d.name.clone()),
            destination_region: destination.map(|d| d.region.clone()),
            destination_base_price: destination.map(|d| d.base_price_weekly),
            destination_countries: destination.map(|d| d.countries.clone()).unwrap_or_default(),
            yacht_id: yacht.map(|y| y.id.clone()),
            yacht_name: yacht.map(|y| y.name.clone()),
            yacht_capacity: yacht.map(|y| y.capacity),
            yacht_price_multiplier: yacht.map(|y| y.price_multiplier),
            guests: selection.guests,
            guest_types: selection.guest_types.clone(),
            reasons: selection.reasons.clone(),
            has_chartered: selection.has_chartered,
            duration: quote.duration_days,
            start_date: selection.start_date,
            end_date: selection.end_date,
            is_bareboat_charter: selection.is_bareboat_charter,
            amenities: selection.amenities.iter().cloned().collect(),
            budget_min: selection.budget_range.map(|b| b.min),
            budget_max: selection.budget_range.map(|b| b.max),
            first_name: contact.first_name.trim().to_string(),
            last_name: contact.last_name.trim().to_string(),
            email: non_empty(&contact.email),
            phone: non_empty(&contact.phone),
            contact_method: contact.contact_method,
            preferred_date: contact.preferred_date,
            preferred_time: contact.preferred_time.as_deref().and_then(non_empty),
            special_requests: non_empty(&contact.special_requests),
            consultation_requested: consultation.requested,
            appointment_date: consultation.appointment_date.filter(|_| consultation.requested),
            appointment_time: consultation.appointment_time.filter(|_| consultation.requested),
            estimated_total: quote.total,
            submitted_at,
        })
    }
}

/// Destination for finished leads (submissions table, CRM, ...)
pub trait LeadSink: Send + Sync {
    fn submit(&self, record: &LeadRecord) -> Result<(), LeadError>;
}

/// Sink that only records the submission in the service log
#[derive(Debug, Default, Clone)]
pub struct LogLeadSink;

impl LeadSink for LogLeadSink {
    fn submit(&self, record: &LeadRecord) -> Result<(), LeadError> {
        info!(
            lead_id = %record.id,
            destination = record.destination_name.as_deref().unwrap_or("-"),
            yacht = record.yacht_id.as_deref().unwrap_or("-"),
            estimated_total = %record.estimated_total,
            consultation = record.consultation_requested,
            "Lead submitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::compute_standard_quote;
    use crate::pricing::models::PriceTable;
    use crate::pricing::requests::{BudgetRange, ContactDetails, SelectionUpdate};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn finished_selection() -> Selection {
        let table = PriceTable::standard();
        Selection::default()
            .apply(SelectionUpdate::Destination(Some(
                table.destination("caribbean").unwrap().to_selection(),
            )))
            .apply(SelectionUpdate::YachtType(Some(
                table.yacht("motor").unwrap().to_selection(),
            )))
            .apply(SelectionUpdate::StartAndNights {
                start: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
                nights: 7,
            })
            .apply(SelectionUpdate::ToggleAmenity("chef".into()))
            .apply(SelectionUpdate::Budget(Some(BudgetRange {
                min: dec!(20000),
                max: dec!(50000),
            })))
            .apply(SelectionUpdate::Contact(Some(ContactDetails {
                first_name: " Ana ".into(),
                last_name: "Silva".into(),
                email: "ana@example.com".into(),
                contact_method: ContactMethod::Call,
                ..ContactDetails::default()
            })))
    }

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_record_carries_selection_and_total() {
        let selection = finished_selection();
        let quote = compute_standard_quote(&selection);
        let record =
            LeadRecord::from_selection(&selection, &quote, &Consultation::default(), submitted_at())
                .unwrap();

        assert_eq!(record.destination_name.as_deref(), Some("Caribbean"));
        assert_eq!(record.destination_base_price, Some(dec!(18000)));
        assert_eq!(record.yacht_id.as_deref(), Some("motor"));
        assert_eq!(record.yacht_price_multiplier, Some(dec!(1.5)));
        assert_eq!(record.duration, 7);
        assert_eq!(record.end_date, NaiveDate::from_ymd_opt(2026, 12, 27));
        assert_eq!(record.amenities, vec!["chef".to_string()]);
        assert_eq!(record.budget_max, Some(dec!(50000)));
        assert_eq!(record.first_name, "Ana");
        assert_eq!(record.phone, None);
        assert_eq!(record.contact_method, ContactMethod::Call);
        // 18000 * 1.5 + 200 * 7
        assert_eq!(record.estimated_total, dec!(28400));
        assert_eq!(record.submitted_at, submitted_at());
    }

    #[test]
    fn test_missing_contact_rejected() {
        let selection = finished_selection().apply(SelectionUpdate::Contact(None));
        let quote = compute_standard_quote(&selection);
        let err =
            LeadRecord::from_selection(&selection, &quote, &Consultation::default(), submitted_at())
                .unwrap_err();
        assert_eq!(err, LeadError::MissingContact);
    }

    #[test]
    fn test_consultation_requires_date() {
        let selection = finished_selection();
        let quote = compute_standard_quote(&selection);
        let consultation = Consultation {
            requested: true,
            appointment_date: None,
            appointment_time: Some(TimeSlot::Morning),
        };
        let err = LeadRecord::from_selection(&selection, &quote, &consultation, submitted_at())
            .unwrap_err();
        assert_eq!(err, LeadError::MissingAppointment);
    }

    #[test]
    fn test_appointment_dropped_when_not_requested() {
        let selection = finished_selection();
        let quote = compute_standard_quote(&selection);
        let consultation = Consultation {
            requested: false,
            appointment_date: NaiveDate::from_ymd_opt(2026, 11, 2),
            appointment_time: Some(TimeSlot::Evening),
        };
        let record =
            LeadRecord::from_selection(&selection, &quote, &consultation, submitted_at()).unwrap();
        assert!(record.appointment_date.is_none());
        assert!(record.appointment_time.is_none());
    }

    #[test]
    fn test_record_serializes_money_as_strings() {
        let selection = finished_selection();
        let quote = compute_standard_quote(&selection);
        let record =
            LeadRecord::from_selection(&selection, &quote, &Consultation::default(), submitted_at())
                .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["estimated_total"], "28400");
        assert_eq!(json["destination_base_price"], "18000");
        assert_eq!(json["contact_method"], "call");
    }

    struct RecordingSink(Mutex<Vec<LeadRecord>>);

    impl LeadSink for RecordingSink {
        fn submit(&self, record: &LeadRecord) -> Result<(), LeadError> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn test_sink_receives_record() {
        let sink = RecordingSink(Mutex::new(Vec::new()));
        let selection = finished_selection();
        let quote = compute_standard_quote(&selection);
        let record =
            LeadRecord::from_selection(&selection, &quote, &Consultation::default(), submitted_at())
                .unwrap();

        sink.submit(&record).unwrap();
        LogLeadSink.submit(&record).unwrap();

        let stored = sink.0.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, record.id);
    }

    #[test]
    fn test_time_slot_labels() {
        assert_eq!(TimeSlot::Midday.label(), "Midday (12:00 - 2:00 PM)");
    }
}
