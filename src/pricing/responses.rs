//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::calculators::QuoteBreakdown;
use crate::pricing::format::QuoteDisplay;
use crate::pricing::validation::{Readiness, ValidationIssue};

/// Currency all charter rates are quoted in
pub const QUOTE_CURRENCY: &str = "USD";

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency: QUOTE_CURRENCY.to_string(),
        }
    }
}

/// Line-item breakdown of a quote
#[derive(Debug, Serialize)]
pub struct QuoteBreakdownResponse {
    pub base_weekly: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub yacht_multiplier: Decimal,
    pub duration_days: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub weeks: Decimal,
    pub weekly_after_multiplier: MoneyResponse,
    pub subtotal: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub bareboat_discount_rate: Decimal,
    pub bareboat_discount_amount: MoneyResponse,
    pub amenities_daily_total: MoneyResponse,
    pub amenities_total: MoneyResponse,
    pub total: MoneyResponse,
}

impl From<&QuoteBreakdown> for QuoteBreakdownResponse {
    fn from(q: &QuoteBreakdown) -> Self {
        Self {
            base_weekly: MoneyResponse::new(q.base_weekly),
            yacht_multiplier: q.yacht_multiplier,
            duration_days: q.duration_days,
            weeks: q.weeks,
            weekly_after_multiplier: MoneyResponse::new(q.weekly_after_multiplier),
            subtotal: MoneyResponse::new(q.subtotal),
            bareboat_discount_rate: q.bareboat_discount_rate,
            bareboat_discount_amount: MoneyResponse::new(q.bareboat_discount_amount),
            amenities_daily_total: MoneyResponse::new(q.amenities_daily_total),
            amenities_total: MoneyResponse::new(q.amenities_total),
            total: MoneyResponse::new(q.total),
        }
    }
}

/// A single validation issue
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub code: String,
    pub message: String,
}

impl From<&ValidationIssue> for IssueResponse {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            code: issue.code().to_string(),
            message: issue.to_string(),
        }
    }
}

/// Readiness report for a selection
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub issues: Vec<IssueResponse>,
}

impl From<&Readiness> for ReadinessResponse {
    fn from(readiness: &Readiness) -> Self {
        Self {
            ready: readiness.is_ready(),
            issues: readiness.issues().iter().map(IssueResponse::from).collect(),
        }
    }
}

/// Response for quote calculation
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub breakdown: QuoteBreakdownResponse,
    pub display: QuoteDisplay,
    pub readiness: ReadinessResponse,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::compute_standard_quote;
    use crate::pricing::requests::Selection;

    #[test]
    fn test_breakdown_response_serializes_money_as_strings() {
        let quote = compute_standard_quote(&Selection::default());
        let json = serde_json::to_value(QuoteBreakdownResponse::from(&quote)).unwrap();
        assert_eq!(json["total"]["amount"], "0");
        assert_eq!(json["total"]["currency"], "USD");
        assert_eq!(json["yacht_multiplier"], "1");
        assert_eq!(json["duration_days"], 7);
    }

    #[test]
    fn test_readiness_response_lists_codes() {
        let readiness = Readiness::NotReady(vec![ValidationIssue::DestinationMissing]);
        let response = ReadinessResponse::from(&readiness);
        assert!(!response.ready);
        assert_eq!(response.issues[0].code, "destination_missing");
        assert_eq!(response.issues[0].message, "destination missing");
    }
}
