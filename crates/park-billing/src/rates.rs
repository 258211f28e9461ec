//! # Rate Tables
//!
//! One `RateConfig` per vehicle category. The table is read on every fee
//! computation and changed only by administrative configuration.
//!
//! Prices are [`UnitPrice`]s and keep whatever precision was configured.
//! Rounding to cents happens once, on the fee total.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use park_core::{UnitPrice, VehicleCategory};

/// Pricing policy for one vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    /// Flat charge covering the first 60 minutes.
    #[serde(rename = "firstHour")]
    pub first_hour_price: UnitPrice,
    /// Charge for each started hour after the first.
    #[serde(rename = "additionalHour")]
    pub additional_hour_price: UnitPrice,
    /// Grace period in minutes. Zero disables it.
    pub tolerance_minutes: u32,
}

impl RateConfig {
    /// Build a rate from already-validated prices.
    pub fn new(
        first_hour_price: UnitPrice,
        additional_hour_price: UnitPrice,
        tolerance_minutes: u32,
    ) -> Self {
        Self {
            first_hour_price,
            additional_hour_price,
            tolerance_minutes,
        }
    }

    fn from_units(first: i64, additional: i64) -> Self {
        let price = |v: i64| UnitPrice::new(Decimal::from(v)).unwrap_or_default();
        Self::new(price(first), price(additional), 0)
    }
}

/// Mapping from vehicle category to its rate policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<VehicleCategory, RateConfig>);

impl RateTable {
    /// A table with no rates configured.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// The rate for `category`, if configured.
    pub fn get(&self, category: VehicleCategory) -> Option<&RateConfig> {
        self.0.get(&category)
    }

    /// Replace the rate for `category`, returning the previous one.
    pub fn set(&mut self, category: VehicleCategory, rate: RateConfig) -> Option<RateConfig> {
        tracing::info!(
            %category,
            first_hour = %rate.first_hour_price,
            additional_hour = %rate.additional_hour_price,
            tolerance_minutes = rate.tolerance_minutes,
            "rate updated"
        );
        self.0.insert(category, rate)
    }

    /// Configured rates in category order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleCategory, &RateConfig)> {
        self.0.iter().map(|(c, r)| (*c, r))
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RateTable {
    /// Standard tariff for a fresh lot. Tolerance is off everywhere.
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(VehicleCategory::Car, RateConfig::from_units(10, 5));
        table.insert(VehicleCategory::Moto, RateConfig::from_units(5, 3));
        table.insert(VehicleCategory::Van, RateConfig::from_units(15, 8));
        table.insert(VehicleCategory::Truck, RateConfig::from_units(25, 15));
        Self(table)
    }
}
