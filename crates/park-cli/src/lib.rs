//! # park-cli — Parking Lot Command-Line Interface
//!
//! Front-desk and back-office operations over a lot document on disk.
//!
//! ## Subcommands
//!
//! - `init` — Create a fresh lot document
//! - `spots` — List, search, and resize spots
//! - `entry` / `quote` / `exit` / `cancel` — The parking session
//! - `tickets` — Ticket history
//! - `rates` — Show and change the tariff
//! - `ledger` — Income and expense log
//! - `customers` — Late monthly subscribers
//! - `backup` — Export and restore
//! - `verify` — Check document invariants
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates. No pricing or occupancy
//!   rules live here.
//! - A handler saves the document only after a transition has committed.

pub mod admin;
pub mod backup;
pub mod config;
pub mod context;
pub mod customers;
pub mod ledger;
pub mod rates;
pub mod session;
pub mod spots;
