//! # park-core — Foundational Types for the Parking Engine
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! builds on, so that identifiers, instants, and money cannot be confused
//! with bare integers, strings, or floats.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `SpotId`, `TicketId`,
//!    `TransactionId` are distinct types. A ticket id cannot be passed
//!    where a transaction id is expected.
//!
//! 2. **Explicit instants.** `Timestamp` is UTC with millisecond precision
//!    and persists as integer epoch milliseconds. Pure functions take
//!    instants as parameters and never read the clock.
//!
//! 3. **Validated money.** `Amount` is a non-negative decimal rounded to
//!    cents. Negative or non-numeric input is rejected at construction.
//!
//! 4. **Closed enums.** `VehicleCategory` and `PaymentMethod` are
//!    exhaustive; adding a variant forces every consumer to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `park-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod money;
pub mod temporal;
pub mod vehicle;

pub use error::ParkError;
pub use identity::{SpotId, TicketId, TransactionId};
pub use money::{Amount, AmountError, UnitPrice};
pub use temporal::Timestamp;
pub use vehicle::{PaymentMethod, VehicleCategory};
