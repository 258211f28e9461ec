//! # Subscriber Lateness
//!
//! A monthly subscriber is late when:
//!
//! - no payment was ever recorded, or
//! - more than 30 whole days passed since the last payment **and** today's
//!   calendar day-of-month is past the subscriber's due day.
//!
//! The compound rule is kept as-is for compatibility with existing
//! behaviour. It misreports subscribers whose due day does not exist in a
//! short month, and subscribers who paid late last cycle but are inside 30
//! days now.
//!
//! The calendar day is taken at the policy's UTC offset. Day counting uses
//! plain 24-hour days between instants.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use park_core::temporal::MILLIS_PER_DAY;
use park_core::{Amount, Timestamp};

/// Whole days a payment stays current.
pub const PAYMENT_WINDOW_DAYS: i64 = 30;

/// The fields of a subscriber record that lateness depends on.
///
/// Deserialized from the stored customer document; fields not listed here
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub plate: String,
    pub monthly_fee: Amount,
    /// Day of month (1..=31) the fee falls due.
    #[serde(rename = "dueDate")]
    pub due_day_of_month: u32,
    #[serde(rename = "lastPayment", default)]
    pub last_payment: Option<Timestamp>,
    #[serde(rename = "isActive")]
    pub active: bool,
}

/// Evaluates subscriber lateness at a fixed calendar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatenessPolicy {
    offset: FixedOffset,
}

impl LatenessPolicy {
    /// Policy evaluating calendar days at `offset`.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Policy evaluating calendar days in UTC.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Build from an offset in minutes east of UTC. `None` if out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    /// The calendar offset in use.
    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    /// Whole days from the last payment to `now`, if any payment exists.
    pub fn days_since_payment(&self, customer: &Customer, now: Timestamp) -> Option<i64> {
        customer
            .last_payment
            .map(|paid| now.millis_since(&paid).div_euclid(MILLIS_PER_DAY))
    }

    /// Whether `customer` is late at `now`.
    pub fn is_late(&self, customer: &Customer, now: Timestamp) -> bool {
        let Some(days) = self.days_since_payment(customer, now) else {
            return true;
        };
        days > PAYMENT_WINDOW_DAYS && now.day_of_month(&self.offset) > customer.due_day_of_month
    }

    /// Active subscribers that are late at `now`.
    pub fn late_customers<'a>(&self, customers: &'a [Customer], now: Timestamp) -> Vec<&'a Customer> {
        customers
            .iter()
            .filter(|c| c.active && self.is_late(c, now))
            .collect()
    }
}

impl Default for LatenessPolicy {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn customer(due: u32, last_payment: Option<Timestamp>) -> Customer {
        Customer {
            id: Some("c1".to_string()),
            name: "Maria".to_string(),
            plate: "ABC1D23".to_string(),
            monthly_fee: Amount::new(dec!(200)).unwrap(),
            due_day_of_month: due,
            last_payment,
            active: true,
        }
    }

    fn days_before(now: Timestamp, days: i64) -> Timestamp {
        now.checked_add(Duration::days(-days)).unwrap()
    }

    #[test]
    fn test_never_paid_is_late() {
        let now = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert!(LatenessPolicy::utc().is_late(&customer(5, None), now));
    }

    #[test]
    fn test_forty_days_after_due_day_is_late() {
        let now = Timestamp::parse("2026-03-10T12:00:00Z").unwrap();
        let c = customer(5, Some(days_before(now, 40)));
        assert!(LatenessPolicy::utc().is_late(&c, now));
    }

    #[test]
    fn test_forty_days_before_due_day_is_not_late() {
        let now = Timestamp::parse("2026-03-03T12:00:00Z").unwrap();
        let c = customer(5, Some(days_before(now, 40)));
        assert!(!LatenessPolicy::utc().is_late(&c, now));
    }

    #[test]
    fn test_exactly_thirty_days_is_not_late() {
        let now = Timestamp::parse("2026-03-20T12:00:00Z").unwrap();
        let c = customer(5, Some(days_before(now, 30)));
        assert!(!LatenessPolicy::utc().is_late(&c, now));
        let c = customer(5, Some(days_before(now, 31)));
        assert!(LatenessPolicy::utc().is_late(&c, now));
    }

    #[test]
    fn test_partial_day_floors() {
        let now = Timestamp::parse("2026-03-20T12:00:00Z").unwrap();
        let paid = now.checked_add(Duration::hours(-(31 * 24 - 1))).unwrap();
        let c = customer(5, Some(paid));
        assert_eq!(LatenessPolicy::utc().days_since_payment(&c, now), Some(30));
        assert!(!LatenessPolicy::utc().is_late(&c, now));
    }

    #[test]
    fn test_due_day_uses_policy_offset() {
        // 02:00Z on the 6th is still the 5th at UTC-3, so not past due day 5.
        let now = Timestamp::parse("2026-03-06T02:00:00Z").unwrap();
        let c = customer(5, Some(days_before(now, 45)));
        assert!(LatenessPolicy::utc().is_late(&c, now));
        let brt = LatenessPolicy::from_offset_minutes(-180).unwrap();
        assert!(!brt.is_late(&c, now));
    }

    #[test]
    fn test_late_customers_skips_inactive() {
        let now = Timestamp::parse("2026-03-10T12:00:00Z").unwrap();
        let mut inactive = customer(5, None);
        inactive.active = false;
        let active = customer(5, None);
        let list = [inactive, active];
        let late = LatenessPolicy::utc().late_customers(&list, now);
        assert_eq!(late.len(), 1);
        assert!(late[0].active);
    }

    #[test]
    fn test_reads_stored_customer_shape() {
        let json = r#"{
            "id": "x1", "name": "João", "plate": "XYZ9A87", "phone": "555",
            "vehicleType": "CAR", "monthlyFee": 200, "dueDate": 5,
            "lastPayment": 1767225600000, "isActive": true
        }"#;
        let c: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(c.due_day_of_month, 5);
        assert_eq!(c.last_payment.unwrap().epoch_millis(), 1_767_225_600_000);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(LatenessPolicy::from_offset_minutes(24 * 60).is_none());
    }
}
