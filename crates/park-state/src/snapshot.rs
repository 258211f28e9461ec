//! # Persisted Lot Document
//!
//! The single JSON document the storage collaborator reads and writes.
//! This crate owns four parts of it: `spots`, `tickets`, `transactions`,
//! and `settings.rates`. Everything else (`customers`, `products`, `users`,
//! `license`, `currentUser`, extra settings) is carried through untouched.
//!
//! Partial and legacy documents load: a missing collection is empty,
//! missing rates are the default tariff.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use park_billing::{Customer, RateTable};
use park_core::ParkError;

use crate::ledger::TransactionLog;
use crate::lot::LotState;
use crate::spot::SpotRegistry;
use crate::ticket::TicketLedger;

/// Company name of a fresh document.
pub const DEFAULT_COMPANY_NAME: &str = "TM Parking";

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

/// `settings` object of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub rates: RateTable,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// Presentation settings this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rates: RateTable::default(),
            company_name: default_company_name(),
            extra: Map::new(),
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tickets: TicketLedger,
    #[serde(default)]
    pub spots: SpotRegistry,
    /// Subscriber records, kept verbatim. See [`Snapshot::customers`].
    #[serde(default)]
    pub customers: Vec<Value>,
    #[serde(default)]
    pub transactions: TransactionLog,
    #[serde(default)]
    pub settings: Settings,
    /// Top-level fields owned by other collaborators.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snapshot {
    /// A new document around a fresh lot.
    pub fn fresh(spot_count: usize, moto_count: usize, company_name: impl Into<String>) -> Self {
        let lot = LotState::fresh(spot_count, moto_count, RateTable::default());
        let mut doc = Self {
            settings: Settings {
                company_name: company_name.into(),
                ..Settings::default()
            },
            ..Self::default()
        };
        doc.commit(lot);
        doc
    }

    pub fn from_json(text: &str) -> Result<Self, ParkError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ParkError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ParkError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The collections the coordinator works on.
    pub fn lot_state(&self) -> LotState {
        LotState {
            spots: self.spots.clone(),
            tickets: self.tickets.clone(),
            transactions: self.transactions.clone(),
            rates: self.settings.rates.clone(),
        }
    }

    /// Replace the core-owned parts with a committed state.
    pub fn commit(&mut self, state: LotState) {
        self.spots = state.spots;
        self.tickets = state.tickets;
        self.transactions = state.transactions;
        self.settings.rates = state.rates;
    }

    /// Typed view of the subscriber records for lateness checks.
    pub fn customers(&self) -> Result<Vec<Customer>, ParkError> {
        self.customers
            .iter()
            .map(|c| serde_json::from_value(c.clone()).map_err(ParkError::from))
            .collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
