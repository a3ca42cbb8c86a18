//! Core quote calculation functions.
//!
//! Pure functions for pricing math - no I/O, no shared state. The wizard
//! calls `compute_quote` on every change while the customer is still
//! choosing, so it accepts incomplete selections and never fails: a missing
//! destination prices at 0, a missing yacht type at a 1x multiplier.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::config::PricingPolicy;
use crate::pricing::models::PriceTable;
use crate::pricing::requests::Selection;

/// Days in a charter week. Durations are prorated against this, not rounded.
pub const DAYS_PER_WEEK: i32 = 7;

/// Round to specified decimal places, halves away from zero.
///
/// Only `total` and displayed amounts are rounded; breakdown lines keep full
/// precision so they do not drift from each other.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use charter_quote::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(11249.5), 0), dec!(11250));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Itemized quote for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBreakdown {
    pub base_weekly: Decimal,
    pub yacht_multiplier: Decimal,
    /// Duration actually priced (at least one day)
    pub duration_days: i32,
    /// `duration_days / 7`, fractional
    pub weeks: Decimal,
    pub weekly_after_multiplier: Decimal,
    /// `weekly_after_multiplier * days / 7`. Dividing last keeps whole weeks
    /// exact; against `weekly_after_multiplier * weeks` it can differ in the
    /// last of 28 digits.
    pub subtotal: Decimal,
    pub bareboat_discount_rate: Decimal,
    pub bareboat_discount_amount: Decimal,
    pub amenities_daily_total: Decimal,
    pub amenities_total: Decimal,
    /// Whole currency units, never negative
    pub total: Decimal,
}

/// Compute the itemized quote for a selection.
///
/// Guests do not influence the price. Amenity ids missing from `table`
/// contribute nothing; the validator reports them separately.
pub fn compute_quote(
    selection: &Selection,
    table: &PriceTable,
    policy: &PricingPolicy,
) -> QuoteBreakdown {
    let base_weekly = selection
        .destination
        .as_ref()
        .map(|d| d.base_price_weekly)
        .unwrap_or(Decimal::ZERO);
    let yacht_multiplier = selection
        .yacht_type
        .as_ref()
        .map(|y| y.price_multiplier)
        .unwrap_or(Decimal::ONE);

    let duration_days = selection.duration_days.max(1);
    let days = Decimal::from(duration_days);
    let days_per_week = Decimal::from(DAYS_PER_WEEK);
    let weeks = days / days_per_week;

    // Saturating ops keep the function total for absurd wire input.
    let weekly_after_multiplier = base_weekly.saturating_mul(yacht_multiplier);
    let subtotal = weekly_after_multiplier.saturating_mul(days) / days_per_week;

    let bareboat_discount_rate = if selection.is_bareboat_charter {
        policy.bareboat_discount_rate
    } else {
        Decimal::ZERO
    };
    let bareboat_discount_amount = subtotal.saturating_mul(bareboat_discount_rate);

    let amenities_daily_total = selection
        .amenities
        .iter()
        .filter_map(|id| table.amenity_daily_price(id))
        .fold(Decimal::ZERO, |acc, price| acc.saturating_add(price));
    let amenities_total = amenities_daily_total.saturating_mul(days);

    let total = round_money(
        subtotal
            .saturating_sub(bareboat_discount_amount)
            .saturating_add(amenities_total),
        0,
    )
    .max(Decimal::ZERO);

    QuoteBreakdown {
        base_weekly,
        yacht_multiplier,
        duration_days,
        weeks,
        weekly_after_multiplier,
        subtotal,
        bareboat_discount_rate,
        bareboat_discount_amount,
        amenities_daily_total,
        amenities_total,
        total,
    }
}

/// Quote with the built-in price table and default policy
pub fn compute_standard_quote(selection: &Selection) -> QuoteBreakdown {
    compute_quote(selection, PriceTable::standard(), &PricingPolicy::default())
}
