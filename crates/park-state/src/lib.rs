//! # park-state — Lot Occupancy State
//!
//! Owns the three mutable collections of a parking lot and the single
//! component allowed to change them together.
//!
//! - **Spots** (`spot.rs`): `SpotRegistry` of `ParkingSpot`, each FREE or
//!   OCCUPIED by one ticket. Capacity resize.
//! - **Tickets** (`ticket.rs`): `TicketLedger`, append-only history of
//!   stays. ACTIVE → PAID | CANCELLED.
//! - **Transactions** (`ledger.rs`): `TransactionLog`, newest first,
//!   append-only.
//! - **Lot** (`lot.rs`): `LotState`, the collections plus the rate table,
//!   and the cross-collection invariant check.
//! - **Session** (`session.rs`): `ParkingSessionCoordinator`, entry, quote,
//!   exit, cancel, resize.
//! - **Snapshot** (`snapshot.rs`): the persisted document, with pass-through
//!   of fields other collaborators own.
//! - **Shared** (`shared.rs`): one lot behind a lock for several terminals.
//!
//! ## Key Design Principles
//!
//! 1. **State replaced, not patched.** Every coordinator operation reads a
//!    `&LotState` and returns a new one. A rejected operation returns an
//!    error and the caller keeps its old state.
//!
//! 2. **Invalid records are unrepresentable.** A spot is `Free` or
//!    `Occupied(TicketId)`; a PAID ticket always carries its settlement.
//!    The flat legacy document shape is converted at the serde boundary.
//!
//! 3. **Report, never repair.** `LotState::verify` lists broken
//!    invariants in a loaded document and leaves the decision to the caller.
//!
//! ## Crate Policy
//!
//! - Depends on `park-core` and `park-billing` only.
//! - No I/O. Persistence lives in `park-store`.
//! - No `.unwrap()` outside tests.

pub mod ledger;
pub mod lot;
pub mod receipt;
pub mod session;
pub mod shared;
pub mod snapshot;
pub mod spot;
pub mod ticket;

pub use ledger::{Transaction, TransactionCategory, TransactionKind, TransactionLog};
pub use lot::{InvariantViolation, LotState};
pub use receipt::{EntryReceipt, ExitReceipt};
pub use session::{
    EntryRequest, ErrorKind, ExitQuote, ExitRequest, ParkingSessionCoordinator, SessionError,
    Transition,
};
pub use shared::SharedLot;
pub use snapshot::{Settings, Snapshot, DEFAULT_COMPANY_NAME};
pub use spot::{Occupancy, ParkingSpot, ResizeOutcome, SpotError, SpotRegistry};
pub use ticket::{normalize_plate, Settlement, Ticket, TicketError, TicketLedger, TicketStatus};
