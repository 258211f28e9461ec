//! # Fee Computation
//!
//! The tiered hourly policy:
//!
//! ```text
//! minutes  = ceil((exit - entry) / 1 min)
//! minutes <= tolerance (tolerance > 0)   → 0
//! otherwise                              → firstHour
//!                                           + ceil((minutes - 60) / 60) × additionalHour   (minutes > 60)
//! ```
//!
//! The tolerance window is all-or-nothing: one minute past it and the full
//! first hour is due. With a zero tolerance every stay, however short, pays
//! at least the first hour. The total is summed at full rate precision and
//! rounded to cents, half away from zero, exactly once.
//!
//! Operators may override the computed amount (for example the
//! "minimum fee" shortcut, which charges exactly the first-hour price).
//! The engine never blocks an override, but [`parse_override`] still
//! rejects non-numeric and negative input.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use park_core::temporal::MILLIS_PER_MINUTE;
use park_core::{Amount, AmountError, Timestamp, UnitPrice, VehicleCategory};

use crate::rates::{RateConfig, RateTable};

/// Length of the flat first-hour block and of each additional block.
pub const BLOCK_MINUTES: u64 = 60;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from fee computation and override validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Exit precedes entry. The fee would be negative.
    #[error("exit time {exit} precedes entry time {entry}")]
    InvalidDuration {
        /// Ticket entry instant.
        entry: Timestamp,
        /// Proposed exit instant.
        exit: Timestamp,
    },

    /// No rate configured for the category. A configuration defect upstream.
    #[error("no rate configured for vehicle category {0}")]
    UnknownVehicleCategory(VehicleCategory),

    /// An override amount failed validation.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

// ─── Breakdown ───────────────────────────────────────────────────────

/// How a fee was derived. Used for exit quotes and receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    /// Stay length, partial minutes rounded up.
    pub minutes: u64,
    /// Whether the stay fell inside the tolerance window.
    pub within_tolerance: bool,
    /// Flat first-hour charge applied (zero inside tolerance), unrounded.
    pub base: UnitPrice,
    /// Additional-hour blocks charged.
    pub additional_blocks: u64,
    /// Charge for the additional blocks, unrounded.
    pub additional: UnitPrice,
    /// Amount owed: `base + additional` rounded to cents.
    pub total: Amount,
}

// ─── Operations ──────────────────────────────────────────────────────

/// Minutes between `entry` and `exit`, any partial minute rounded up.
///
/// # Errors
///
/// [`BillingError::InvalidDuration`] if `exit` is before `entry`.
pub fn elapsed_minutes(entry: Timestamp, exit: Timestamp) -> Result<u64, BillingError> {
    let millis = exit.millis_since(&entry);
    if millis < 0 {
        return Err(BillingError::InvalidDuration { entry, exit });
    }
    let millis = millis.unsigned_abs();
    let per_minute = MILLIS_PER_MINUTE.unsigned_abs();
    Ok(millis.div_ceil(per_minute))
}

/// Apply the tiered policy of `rate` to a stay of `minutes`.
pub fn fee_for_minutes(minutes: u64, rate: &RateConfig) -> FeeBreakdown {
    let tolerance = u64::from(rate.tolerance_minutes);
    if tolerance > 0 && minutes <= tolerance {
        return FeeBreakdown {
            minutes,
            within_tolerance: true,
            base: UnitPrice::ZERO,
            additional_blocks: 0,
            additional: UnitPrice::ZERO,
            total: Amount::ZERO,
        };
    }

    let base = rate.first_hour_price;
    let additional_blocks = if minutes > BLOCK_MINUTES {
        (minutes - BLOCK_MINUTES).div_ceil(BLOCK_MINUTES)
    } else {
        0
    };
    let additional = rate.additional_hour_price.times(additional_blocks);
    let total = base.saturating_add(additional).rounded();

    FeeBreakdown {
        minutes,
        within_tolerance: false,
        base,
        additional_blocks,
        additional,
        total,
    }
}

/// Full derivation of the fee for a stay.
pub fn fee_breakdown(
    entry: Timestamp,
    exit: Timestamp,
    category: VehicleCategory,
    rates: &RateTable,
) -> Result<FeeBreakdown, BillingError> {
    let minutes = elapsed_minutes(entry, exit)?;
    let rate = rates
        .get(category)
        .ok_or(BillingError::UnknownVehicleCategory(category))?;
    let breakdown = fee_for_minutes(minutes, rate);
    tracing::debug!(
        %category,
        minutes,
        total = %breakdown.total,
        within_tolerance = breakdown.within_tolerance,
        "fee computed"
    );
    Ok(breakdown)
}

/// Amount owed for a stay from `entry` to `exit`.
pub fn compute_fee(
    entry: Timestamp,
    exit: Timestamp,
    category: VehicleCategory,
    rates: &RateTable,
) -> Result<Amount, BillingError> {
    fee_breakdown(entry, exit, category, rates).map(|b| b.total)
}

/// The "charge minimum fee" override value: the category's first-hour
/// price, rounded to cents.
pub fn minimum_fee(category: VehicleCategory, rates: &RateTable) -> Result<Amount, BillingError> {
    rates
        .get(category)
        .map(|r| r.first_hour_price.rounded())
        .ok_or(BillingError::UnknownVehicleCategory(category))
}

/// Validate operator-entered override text.
pub fn parse_override(input: &str) -> Result<Amount, BillingError> {
    Ok(Amount::parse(input)?)
}

/// Validate an override already held as a decimal.
pub fn validate_override(value: Decimal) -> Result<Amount, BillingError> {
    Ok(Amount::new(value)?)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn price(v: Decimal) -> UnitPrice {
        UnitPrice::new(v).unwrap()
    }

    fn table(first: Decimal, additional: Decimal, tolerance: u32) -> RateTable {
        let mut t = RateTable::empty();
        t.set(
            VehicleCategory::Car,
            RateConfig::new(price(first), price(additional), tolerance),
        );
        t
    }

    fn at(minutes: i64) -> Timestamp {
        Timestamp::from_millis(1_767_225_600_000 + minutes * MILLIS_PER_MINUTE).unwrap()
    }

    fn fee(minutes: i64, rates: &RateTable) -> Decimal {
        compute_fee(at(0), at(minutes), VehicleCategory::Car, rates)
            .unwrap()
            .value()
    }

    // ── Duration rounding ───────────────────────────────────────────

    #[test]
    fn test_partial_minute_rounds_up() {
        let entry = at(0);
        let exit = Timestamp::from_millis(entry.epoch_millis() + 60_001).unwrap();
        assert_eq!(elapsed_minutes(entry, exit).unwrap(), 2);
        let exit = Timestamp::from_millis(entry.epoch_millis() + 1).unwrap();
        assert_eq!(elapsed_minutes(entry, exit).unwrap(), 1);
    }

    #[test]
    fn test_zero_length_stay_is_zero_minutes() {
        assert_eq!(elapsed_minutes(at(5), at(5)).unwrap(), 0);
    }

    #[test]
    fn test_exit_before_entry_rejected() {
        let err = compute_fee(at(10), at(0), VehicleCategory::Car, &RateTable::default());
        assert!(matches!(err, Err(BillingError::InvalidDuration { .. })));
    }

    // ── Tolerance ───────────────────────────────────────────────────

    #[test]
    fn test_tolerance_boundary() {
        let rates = table(dec!(10), dec!(5), 30);
        assert_eq!(fee(30, &rates), dec!(0));
        assert_eq!(fee(31, &rates), dec!(10));
    }

    #[test]
    fn test_zero_tolerance_charges_first_hour_immediately() {
        let rates = table(dec!(10), dec!(5), 0);
        assert_eq!(fee(1, &rates), dec!(10));
        assert_eq!(fee(0, &rates), dec!(10));
    }

    #[test]
    fn test_tolerance_covers_zero_length_stay() {
        let rates = table(dec!(10), dec!(5), 5);
        assert_eq!(fee(0, &rates), dec!(0));
    }

    // ── Hour tiering ────────────────────────────────────────────────

    #[test]
    fn test_exactly_one_hour_is_first_hour_only() {
        let rates = table(dec!(10), dec!(5), 0);
        assert_eq!(fee(60, &rates), dec!(10));
    }

    #[test]
    fn test_61_minutes_adds_one_block() {
        let rates = table(dec!(10), dec!(5), 0);
        assert_eq!(fee(61, &rates), dec!(15));
    }

    #[test]
    fn test_125_minutes_adds_two_blocks() {
        let rates = table(dec!(10), dec!(5), 0);
        assert_eq!(fee(125, &rates), dec!(20));
        let b = fee_breakdown(at(0), at(125), VehicleCategory::Car, &rates).unwrap();
        assert_eq!(b.additional_blocks, 2);
        assert_eq!(b.additional.value(), dec!(10));
        assert!(!b.within_tolerance);
    }

    #[test]
    fn test_fractional_prices_round_total_once() {
        let rates = table(dec!(4.335), dec!(2.125), 0);
        // 4.335 + 2.125 = 6.46 exactly; rounding each part would give 6.47
        assert_eq!(fee(61, &rates), dec!(6.46));
        assert_eq!(fee(60, &rates), dec!(4.34));
        let b = fee_breakdown(at(0), at(61), VehicleCategory::Car, &rates).unwrap();
        assert_eq!(b.base.value(), dec!(4.335));
        assert_eq!(b.additional.value(), dec!(2.125));
    }

    #[test]
    fn test_fractional_additional_rounds_after_multiplying() {
        let rates = table(dec!(1), dec!(0.333), 0);
        // 1 + 3 × 0.333 = 1.999
        assert_eq!(fee(240, &rates), dec!(2.00));
    }

    // ── Rate lookup ─────────────────────────────────────────────────

    #[test]
    fn test_unknown_category_is_distinct_error() {
        let rates = table(dec!(10), dec!(5), 0);
        let err = compute_fee(at(0), at(10), VehicleCategory::Truck, &rates).unwrap_err();
        assert_eq!(err, BillingError::UnknownVehicleCategory(VehicleCategory::Truck));
    }

    // ── Overrides ───────────────────────────────────────────────────

    #[test]
    fn test_minimum_fee_is_first_hour_price() {
        let rates = RateTable::default();
        assert_eq!(minimum_fee(VehicleCategory::Van, &rates).unwrap().value(), dec!(15));
        let rates = table(dec!(4.335), dec!(2), 0);
        assert_eq!(minimum_fee(VehicleCategory::Car, &rates).unwrap().value(), dec!(4.34));
    }

    #[test]
    fn test_override_validation() {
        assert_eq!(parse_override("7.5").unwrap().value(), dec!(7.5));
        assert!(matches!(parse_override("x"), Err(BillingError::InvalidAmount(_))));
        assert!(matches!(parse_override("-1"), Err(BillingError::InvalidAmount(_))));
        assert!(matches!(
            validate_override(dec!(-0.5)),
            Err(BillingError::InvalidAmount(_))
        ));
    }
}
