//! # Snapshot Stores
//!
//! [`JsonFileStore`] keeps the document in one JSON file. A save writes a
//! sibling temporary file and renames it over the target, so a crash
//! mid-write leaves the previous document intact.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use park_state::Snapshot;

use crate::error::StoreError;

/// Where the lot document lives.
pub trait SnapshotStore {
    /// The stored document, or a fresh one if nothing is stored yet.
    fn load(&self) -> Result<Snapshot, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Layout of the document created when nothing is stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshLayout {
    pub spot_count: usize,
    pub moto_count: usize,
    pub company_name: String,
}

impl Default for FreshLayout {
    fn default() -> Self {
        Self {
            spot_count: 30,
            moto_count: 5,
            company_name: park_state::DEFAULT_COMPANY_NAME.to_string(),
        }
    }
}

impl FreshLayout {
    pub fn build(&self) -> Snapshot {
        Snapshot::fresh(self.spot_count, self.moto_count, self.company_name.clone())
    }
}

/// Parse document text. Invariant violations are logged, not rejected;
/// callers that must refuse them use [`park_state::LotState::verify`].
pub(crate) fn parse_document(text: &str) -> Result<Snapshot, StoreError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(StoreError::Parse)?;
    let snapshot: Snapshot = serde_json::from_value(value).map_err(StoreError::Shape)?;
    for violation in snapshot.lot_state().violations() {
        tracing::warn!(%violation, "invariant violation in stored document");
    }
    Ok(snapshot)
}

// ─── File ────────────────────────────────────────────────────────────

/// The document as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    layout: FreshLayout,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, layout: FreshLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored document; starting fresh");
                return Ok(self.layout.build());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "document loaded");
        parse_document(&text)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)?;
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, json.as_bytes()).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "document saved");
        Ok(())
    }
}

// ─── Memory ──────────────────────────────────────────────────────────

/// A store that keeps the document in memory. For tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Mutex<Option<Snapshot>>,
    layout: FreshLayout,
}

impl MemoryStore {
    pub fn new(layout: FreshLayout) -> Self {
        Self {
            current: Mutex::new(None),
            layout,
        }
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: Mutex::new(Some(snapshot)),
            layout: FreshLayout::default(),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        Ok(self
            .current
            .lock()
            .clone()
            .unwrap_or_else(|| self.layout.build()))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.current.lock() = Some(snapshot.clone());
        Ok(())
    }
}
