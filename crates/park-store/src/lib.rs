//! # park-store — Lot Document Storage
//!
//! Loads and saves the [`Snapshot`](park_state::Snapshot) document. The
//! engine replaces its state wholesale after each committed transition;
//! this crate writes that state out afterwards, never during.
//!
//! - **Store** (`store.rs`): the [`SnapshotStore`] trait, a JSON file
//!   store that replaces the file atomically, and an in-memory store.
//! - **Backup** (`backup.rs`): export as pretty JSON, and restore with
//!   shape and invariant checks before anything is accepted.
//!
//! ## Crate Policy
//!
//! - Load verifies cross-collection invariants and reports violations.
//!   It never repairs them.
//! - A missing file is a fresh lot, not an error.

pub mod backup;
pub mod error;
pub mod store;

pub use backup::{export_backup, restore_backup};
pub use error::StoreError;
pub use store::{FreshLayout, JsonFileStore, MemoryStore, SnapshotStore};
