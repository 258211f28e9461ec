//! # Backup Export and Restore
//!
//! A backup is the lot document as pretty-printed JSON. Restore accepts
//! text only if it is a JSON object with `spots` and `transactions`
//! arrays, deserializes into a [`Snapshot`], and passes
//! [`LotState::verify`](park_state::LotState::verify). Nothing is written
//! by this module; the caller saves the result.

use park_state::Snapshot;
use serde_json::Value;

use crate::error::StoreError;

const REQUIRED_COLLECTIONS: [&str; 2] = ["spots", "transactions"];

pub fn export_backup(snapshot: &Snapshot) -> Result<String, StoreError> {
    serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)
}

pub fn restore_backup(text: &str) -> Result<Snapshot, StoreError> {
    let value: Value = serde_json::from_str(text).map_err(StoreError::Parse)?;
    for key in REQUIRED_COLLECTIONS {
        if !value.get(key).is_some_and(Value::is_array) {
            tracing::warn!(missing = key, "backup rejected");
            return Err(StoreError::MissingCollection(key));
        }
    }

    let snapshot: Snapshot = serde_json::from_value(value).map_err(StoreError::Shape)?;
    snapshot.lot_state().verify().map_err(|violations| {
        tracing::warn!(count = violations.len(), "backup rejected: invariant violations");
        StoreError::Integrity(violations)
    })?;

    tracing::info!(
        spots = snapshot.spots.len(),
        tickets = snapshot.tickets.len(),
        transactions = snapshot.transactions.len(),
        "backup restored"
    );
    Ok(snapshot)
}
