//! Display formatting for quotes.
//!
//! Everything here is presentation: the estimate band, rounding of line
//! items and budget comparisons never feed back into a `Selection` or a
//! `QuoteBreakdown`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::config::PricingPolicy;
use crate::pricing::calculators::{round_money, QuoteBreakdown, DAYS_PER_WEEK};
use crate::pricing::requests::{BudgetRange, Selection};

/// Whole-unit dollar amount with thousands separators, e.g. `$16,750`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_money(amount, 0);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "1 night" / "N nights"
pub fn pluralize_nights(nights: i32) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{} nights", nights)
    }
}

fn plural(count: i32, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Human description of a charter length in days and weeks
pub fn describe_duration(days: i32) -> String {
    let weeks = days / DAYS_PER_WEEK;
    let rest = days % DAYS_PER_WEEK;
    match (weeks, rest) {
        (w, 0) if w > 0 => plural(w, "week"),
        (0, _) => plural(days, "day"),
        (w, r) => format!("{} days ({} + {})", days, plural(w, "week"), plural(r, "day")),
    }
}

/// Multiplier as shown next to the yacht, e.g. `1.5x`
pub fn format_multiplier(multiplier: Decimal) -> String {
    format!("{}x", multiplier.normalize())
}

/// Rate as a percentage, e.g. `25%`
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

/// Low/high range shown instead of a point estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateBand {
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
}

/// Widen a total into the uncertainty band configured in `policy`
pub fn estimate_band(total: Decimal, policy: &PricingPolicy) -> EstimateBand {
    EstimateBand {
        low: round_money(total.saturating_mul(policy.estimate_band_low), 0),
        high: round_money(total.saturating_mul(policy.estimate_band_high), 0),
    }
}

/// Where a quote lands relative to the customer's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetFit {
    BelowBudget,
    WithinBudget,
    AboveBudget,
}

pub fn budget_fit(total: Decimal, budget: Option<&BudgetRange>) -> Option<BudgetFit> {
    let budget = budget?;
    Some(if total < budget.min {
        BudgetFit::BelowBudget
    } else if total > budget.max {
        BudgetFit::AboveBudget
    } else {
        BudgetFit::WithinBudget
    })
}

/// One line of the price breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub label: String,
    pub value: String,
}

impl LineItem {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A quote ready for the summary card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteDisplay {
    pub headline: String,
    pub duration: String,
    pub package: String,
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<EstimateBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_fit: Option<BudgetFit>,
    pub disclaimer: String,
}

const DISCLAIMER: &str = "Prices are estimates and may vary based on availability, \
seasonal rates, and final specifications. A broker will provide an exact quote.";

/// Lay out a breakdown for display
pub fn render_quote(
    quote: &QuoteBreakdown,
    selection: &Selection,
    policy: &PricingPolicy,
) -> QuoteDisplay {
    let mut line_items = vec![
        LineItem::new(
            "Base price",
            format!("{}/week", format_currency(quote.base_weekly)),
        ),
        LineItem::new("Yacht multiplier", format_multiplier(quote.yacht_multiplier)),
        LineItem::new("Duration", pluralize_nights(quote.duration_days)),
        LineItem::new("Subtotal", format_currency(quote.subtotal)),
    ];

    if quote.bareboat_discount_rate > Decimal::ZERO {
        line_items.push(LineItem::new(
            format!(
                "Bareboat discount ({})",
                format_percent(quote.bareboat_discount_rate)
            ),
            format_currency(-quote.bareboat_discount_amount),
        ));
    }

    if quote.amenities_daily_total > Decimal::ZERO {
        line_items.push(LineItem::new(
            format!("Amenities ({}/day)", format_currency(quote.amenities_daily_total)),
            format_currency(quote.amenities_total),
        ));
    }

    line_items.push(LineItem::new(
        "Total estimated cost",
        format_currency(quote.total),
    ));

    let band = policy
        .show_estimate_band
        .then(|| estimate_band(quote.total, policy));

    let headline = match band {
        Some(b) => format!("{} - {}", format_currency(b.low), format_currency(b.high)),
        None => format_currency(quote.total),
    };

    let package = if selection.is_bareboat_charter {
        "Bareboat charter"
    } else {
        "Fully crewed"
    };

    QuoteDisplay {
        headline,
        duration: describe_duration(quote.duration_days),
        package: package.to_string(),
        line_items,
        band,
        budget_fit: budget_fit(quote.total, selection.budget_range.as_ref()),
        disclaimer: DISCLAIMER.to_string(),
    }
}
