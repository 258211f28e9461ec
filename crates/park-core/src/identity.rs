//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier namespace in the lot. They prevent
//! accidental confusion: a `TicketId` cannot be passed where a
//! `TransactionId` is expected.
//!
//! Ticket and transaction ids are strings because legacy documents carry
//! short random tokens. Freshly generated ids are UUID v4, which removes
//! the collision risk of those tokens for the lifetime of a dataset.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable integer identifier of a physical parking spot.
///
/// Stored as a JSON number. A whole float such as `7.0` is accepted; a
/// fractional or out-of-range id is rejected with a message naming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpotId(pub u32);

/// Unique identifier of a parking ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

/// Unique identifier of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl SpotId {
    /// The raw integer value.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// The identifier that follows this one.
    pub fn next(&self) -> SpotId {
        SpotId(self.0.saturating_add(1))
    }
}

impl TicketId {
    /// Generate a new random ticket identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (e.g., read from a legacy document).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionId {
    /// Generate a new random transaction identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for SpotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpotIdVisitor)
    }
}

struct SpotIdVisitor;

impl Visitor<'_> for SpotIdVisitor {
    type Value = SpotId;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a whole-number spot id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SpotId, E> {
        u32::try_from(v)
            .map(SpotId)
            .map_err(|_| E::custom(format!("spot id {v} is out of range")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SpotId, E> {
        u32::try_from(v)
            .map(SpotId)
            .map_err(|_| E::custom(format!("spot id {v} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SpotId, E> {
        if v.fract() != 0.0 || !v.is_finite() {
            // Spots added by older releases carried random fractional ids.
            return Err(E::custom(format!(
                "spot id {v} is not a whole number; renumber the spots (and the tickets' spotId) before loading"
            )));
        }
        if v < 0.0 || v > f64::from(u32::MAX) {
            return Err(E::custom(format!("spot id {v} is out of range")));
        }
        Ok(SpotId(v as u32))
    }
}

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
