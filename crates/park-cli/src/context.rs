//! Shared plumbing for subcommand handlers: configuration, the document
//! store, and the clock.

use anyhow::{Context as _, Result};
use park_core::Timestamp;
use park_state::Snapshot;
use park_store::{JsonFileStore, SnapshotStore};

use crate::config::ParkConfig;

/// Everything a handler needs to load and save the lot.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ParkConfig,
    store: JsonFileStore,
}

impl Context {
    pub fn new(config: ParkConfig) -> Self {
        let store = JsonFileStore::new(config.state_path.clone(), config.fresh_layout());
        Self { config, store }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn load(&self) -> Result<Snapshot> {
        self.store
            .load()
            .with_context(|| format!("loading {}", self.store.path().display()))
    }

    /// Write a committed document.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.store
            .save(snapshot)
            .with_context(|| format!("saving {}", self.store.path().display()))
    }
}

/// `at` parsed as RFC 3339, or the current time.
pub fn resolve_time(at: Option<&str>) -> Result<Timestamp> {
    match at {
        Some(s) => Timestamp::parse(s).with_context(|| format!("invalid --at value {s:?}")),
        None => Ok(Timestamp::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_time_parses_offset() {
        let t = resolve_time(Some("2026-01-01T09:00:00-03:00")).unwrap();
        assert_eq!(t.to_iso8601(), "2026-01-01T12:00:00Z");
    }

    #[test]
    fn test_resolve_time_rejects_garbage() {
        assert!(resolve_time(Some("yesterday")).is_err());
    }
}
