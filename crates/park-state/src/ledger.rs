//! # Transaction Log
//!
//! Append-only record of income and expense events, most recent first.
//! The parking coordinator appends one INCOME/PARKING entry per paid
//! exit; other collaborators (store sales, subscriptions, payroll) append
//! their own entries. Nothing here edits or removes an entry. Corrections
//! are new offsetting entries.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use park_core::{Amount, PaymentMethod, Timestamp, TransactionId};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// What a ledger entry is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    Parking,
    Subscription,
    #[serde(alias = "STORE_SALE", alias = "PRODUCT")]
    ProductSale,
    Salary,
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl TransactionCategory {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parking => "PARKING",
            Self::Subscription => "SUBSCRIPTION",
            Self::ProductSale => "PRODUCT_SALE",
            Self::Salary => "SALARY",
            Self::Other => "OTHER",
        }
    }
}

/// One income or expense event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    pub amount: Amount,
    pub description: String,
    pub date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl Transaction {
    /// A new entry with a fresh id.
    pub fn new(
        kind: TransactionKind,
        category: TransactionCategory,
        amount: Amount,
        description: impl Into<String>,
        date: Timestamp,
        payment_method: Option<PaymentMethod>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            category,
            amount,
            description: description.into(),
            date,
            payment_method,
        }
    }

    /// The income entry recorded when a parked vehicle pays and leaves.
    pub fn parking_income(
        plate: &str,
        amount: Amount,
        date: Timestamp,
        payment_method: PaymentMethod,
    ) -> Self {
        Self::new(
            TransactionKind::Income,
            TransactionCategory::Parking,
            amount,
            format!("Exit plate {plate}"),
            date,
            Some(payment_method),
        )
    }
}

/// Reverse-chronological sequence of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "VecDeque<Transaction>", into = "VecDeque<Transaction>")]
pub struct TransactionLog {
    entries: VecDeque<Transaction>,
}

impl TransactionLog {
    /// Record `transaction` as the most recent entry.
    pub fn append(&mut self, transaction: Transaction) {
        self.entries.push_front(transaction);
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.entries.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<VecDeque<Transaction>> for TransactionLog {
    type Error = String;

    fn try_from(entries: VecDeque<Transaction>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::new();
        for t in &entries {
            if !seen.insert(&t.id) {
                return Err(format!("duplicate transaction id {}", t.id));
            }
        }
        Ok(Self { entries })
    }
}

impl From<TransactionLog> for VecDeque<Transaction> {
    fn from(l: TransactionLog) -> Self {
        l.entries
    }
}
