//! # Parking Session Coordinator
//!
//! Entry and exit as single transitions across the spot registry, the
//! ticket ledger, the billing policy, and the transaction log.
//!
//! ## Spot State Machine
//!
//! ```text
//!            enter(plate)
//!   FREE ───────────────────▶ OCCUPIED
//!     ▲                          │
//!     │   exit(amount, method)   │
//!     └──────────────────────────┤
//!     │   cancel()               │
//!     └──────────────────────────┘
//! ```
//!
//! Every operation takes the current `LotState` by reference, checks its
//! preconditions, applies all mutations to a copy, and returns the copy.
//! On any error the caller's state is untouched and the copy is dropped,
//! so spots, tickets, and transactions never drift apart.
//!
//! The coordinator holds no state. It is the only writer of the three
//! collections.

use serde::Serialize;
use thiserror::Error;

use park_billing::{elapsed_minutes, fee_breakdown, minimum_fee, BillingError, FeeBreakdown, RateConfig};
use park_core::{Amount, PaymentMethod, SpotId, TicketId, Timestamp, TransactionId, VehicleCategory};

use crate::ledger::Transaction;
use crate::lot::LotState;
use crate::receipt::{EntryReceipt, ExitReceipt};
use crate::spot::{ResizeOutcome, SpotError};
use crate::ticket::{Ticket, TicketError};

// ─── Errors ──────────────────────────────────────────────────────────

/// A rejected coordinator operation. No state was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[deny(missing_docs)]
pub enum SessionError {
    /// The spot registry refused the change (unknown spot, occupied spot,
    /// or a resize that would drop an occupied spot).
    #[error(transparent)]
    Spot(#[from] SpotError),

    /// The ticket ledger refused the change (blank plate, closed or
    /// missing ticket, exit before entry).
    #[error(transparent)]
    Ticket(#[from] TicketError),

    /// The fee could not be computed or the charged amount is invalid.
    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Coarse classification of a [`SessionError`] for callers that report
/// failures to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[deny(missing_docs)]
pub enum ErrorKind {
    /// No spot has the requested id.
    SpotNotFound,
    /// No ticket has the requested id.
    TicketNotFound,
    /// Entry at a spot that already holds a vehicle.
    SpotAlreadyOccupied,
    /// The ticket is PAID or CANCELLED, or the spot holds no open ticket.
    TicketNotActive,
    /// Exit time precedes entry time.
    InvalidDuration,
    /// Blank licence plate.
    InvalidPlate,
    /// Negative or non-numeric charge.
    InvalidAmount,
    /// No rate configured for the vehicle category.
    UnknownVehicleCategory,
    /// Resize would remove an occupied spot, or the requested count is invalid.
    CapacityConflict,
}

impl ErrorKind {
    /// Whether the failure points at lot configuration rather than operator input.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(self, Self::UnknownVehicleCategory)
    }
}

impl SessionError {
    /// The operator-facing classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Spot(SpotError::NotFound { .. }) => ErrorKind::SpotNotFound,
            Self::Spot(SpotError::AlreadyOccupied { .. }) => ErrorKind::SpotAlreadyOccupied,
            Self::Spot(SpotError::OccupiedSpotRemoval { .. } | SpotError::InvalidCapacity { .. }) => {
                ErrorKind::CapacityConflict
            }
            Self::Ticket(TicketError::NotFound { .. }) => ErrorKind::TicketNotFound,
            Self::Ticket(TicketError::NotActive { .. } | TicketError::NoActiveTicket { .. }) => {
                ErrorKind::TicketNotActive
            }
            Self::Ticket(TicketError::InvalidPlate) => ErrorKind::InvalidPlate,
            Self::Ticket(TicketError::ExitBeforeEntry { .. }) => ErrorKind::InvalidDuration,
            Self::Billing(BillingError::InvalidDuration { .. }) => ErrorKind::InvalidDuration,
            Self::Billing(BillingError::UnknownVehicleCategory(_)) => {
                ErrorKind::UnknownVehicleCategory
            }
            Self::Billing(BillingError::InvalidAmount(_)) => ErrorKind::InvalidAmount,
        }
    }
}

// ─── Requests and Results ────────────────────────────────────────────

/// A vehicle arriving at a spot.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub spot_id: SpotId,
    pub plate: String,
    /// Defaults to the category the spot is sized for.
    pub category: Option<VehicleCategory>,
    pub model: Option<String>,
    pub at: Timestamp,
}

/// A vehicle paying and leaving.
#[derive(Debug, Clone)]
pub struct ExitRequest {
    pub spot_id: SpotId,
    pub exit_time: Timestamp,
    /// The amount actually charged: the quote or an operator override.
    pub amount: Amount,
    pub payment_method: PaymentMethod,
}

/// A committed transition: the new lot state and what happened.
#[derive(Debug, Clone)]
pub struct Transition<T> {
    pub state: LotState,
    pub outcome: T,
}

/// Provisional charge shown when an occupied spot is selected for exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitQuote {
    pub ticket_id: TicketId,
    pub plate: String,
    pub category: VehicleCategory,
    pub spot_label: String,
    pub entry_time: Timestamp,
    pub quoted_at: Timestamp,
    pub breakdown: FeeBreakdown,
    /// Computed fee at `quoted_at`.
    pub suggested: Amount,
    /// The "charge minimum fee" override value.
    pub minimum: Amount,
}

// ─── Coordinator ─────────────────────────────────────────────────────

/// Stateless orchestrator of entry, exit, and the other lot transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParkingSessionCoordinator;

impl ParkingSessionCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// FREE → OCCUPIED. Opens a ticket and binds it to the spot.
    ///
    /// Emits no transaction; the fee is charged at exit.
    pub fn enter(
        &self,
        state: &LotState,
        request: EntryRequest,
    ) -> Result<Transition<EntryReceipt>, SessionError> {
        let spot = state.spots.find(request.spot_id).ok_or(SpotError::NotFound {
            spot_id: request.spot_id,
        })?;
        let holder = spot
            .current_ticket()
            .cloned()
            .or_else(|| {
                state
                    .tickets
                    .active_ticket_for_spot(request.spot_id)
                    .map(|t| t.id().clone())
            });
        if let Some(ticket_id) = holder {
            tracing::warn!(spot_id = %request.spot_id, %ticket_id, "entry rejected: spot occupied");
            return Err(SpotError::AlreadyOccupied {
                spot_id: request.spot_id,
                ticket_id,
            }
            .into());
        }

        let category = request.category.unwrap_or(spot.category());
        let spot_label = spot.label().to_string();

        let mut next = state.clone();
        let ticket = next
            .tickets
            .open(
                &request.plate,
                category,
                Some(request.spot_id),
                request.model,
                request.at,
            )?
            .clone();
        next.spots.mark_occupied(request.spot_id, ticket.id().clone())?;

        tracing::info!(
            spot_id = %request.spot_id,
            ticket_id = %ticket.id(),
            plate = ticket.plate(),
            %category,
            "vehicle entered"
        );
        metrics::counter!("park_entries_total", "category" => category.as_str()).increment(1);

        Ok(Transition {
            state: next,
            outcome: EntryReceipt {
                ticket_id: ticket.id().clone(),
                plate: ticket.plate().to_string(),
                category,
                spot_id: request.spot_id,
                spot_label,
                entry_time: ticket.entry_time(),
            },
        })
    }

    /// The suggested fee for an occupied spot if it were to leave at `now`.
    pub fn quote(
        &self,
        state: &LotState,
        spot_id: SpotId,
        now: Timestamp,
    ) -> Result<ExitQuote, SessionError> {
        let (label, ticket) = active_ticket_on(state, spot_id)?;
        let breakdown = fee_breakdown(ticket.entry_time(), now, ticket.category(), &state.rates)?;
        let minimum = minimum_fee(ticket.category(), &state.rates)?;
        Ok(ExitQuote {
            ticket_id: ticket.id().clone(),
            plate: ticket.plate().to_string(),
            category: ticket.category(),
            spot_label: label.to_string(),
            entry_time: ticket.entry_time(),
            quoted_at: now,
            breakdown,
            suggested: breakdown.total,
            minimum,
        })
    }

    /// OCCUPIED → FREE. Closes the ticket as PAID, frees the spot, and
    /// records the income, all in one transition.
    pub fn exit(
        &self,
        state: &LotState,
        request: ExitRequest,
    ) -> Result<Transition<ExitReceipt>, SessionError> {
        let (label, ticket) = active_ticket_on(state, request.spot_id)?;
        let minutes = elapsed_minutes(ticket.entry_time(), request.exit_time)?;
        let spot_label = label.to_string();
        let ticket_id = ticket.id().clone();

        let mut next = state.clone();
        let closed = next
            .tickets
            .close(&ticket_id, request.exit_time, request.amount, request.payment_method)?
            .clone();
        next.spots.mark_free(request.spot_id)?;
        let transaction = Transaction::parking_income(
            closed.plate(),
            request.amount,
            request.exit_time,
            request.payment_method,
        );
        let transaction_id: TransactionId = transaction.id.clone();
        next.transactions.append(transaction);

        tracing::info!(
            spot_id = %request.spot_id,
            %ticket_id,
            amount = %request.amount,
            payment_method = %request.payment_method,
            minutes,
            "vehicle exited"
        );
        metrics::counter!("park_exits_total", "category" => closed.category().as_str())
            .increment(1);

        Ok(Transition {
            state: next,
            outcome: ExitReceipt {
                ticket_id,
                plate: closed.plate().to_string(),
                category: closed.category(),
                spot_id: request.spot_id,
                spot_label,
                entry_time: closed.entry_time(),
                exit_time: request.exit_time,
                elapsed_minutes: minutes,
                amount: request.amount,
                payment_method: request.payment_method,
                transaction_id,
            },
        })
    }

    /// OCCUPIED → FREE without charge. The ticket becomes CANCELLED and no
    /// transaction is recorded.
    pub fn cancel(
        &self,
        state: &LotState,
        spot_id: SpotId,
    ) -> Result<Transition<Ticket>, SessionError> {
        let (_, ticket) = active_ticket_on(state, spot_id)?;
        let ticket_id = ticket.id().clone();

        let mut next = state.clone();
        let cancelled = next.tickets.cancel(&ticket_id)?.clone();
        next.spots.mark_free(spot_id)?;

        tracing::info!(%spot_id, %ticket_id, "ticket cancelled");
        metrics::counter!("park_cancellations_total", "category" => cancelled.category().as_str())
            .increment(1);

        Ok(Transition {
            state: next,
            outcome: cancelled,
        })
    }

    /// Change the number of spots. Shrinking over an occupied spot is rejected.
    pub fn resize(
        &self,
        state: &LotState,
        new_count: usize,
        category: VehicleCategory,
    ) -> Result<Transition<ResizeOutcome>, SessionError> {
        let mut next = state.clone();
        let outcome = next.spots.resize(new_count, category).map_err(|e| {
            tracing::warn!(new_count, error = %e, "resize rejected");
            e
        })?;
        tracing::info!(
            new_count,
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            "spot capacity updated"
        );
        Ok(Transition {
            state: next,
            outcome,
        })
    }

    /// Replace the rate for one category. Returns the previous rate.
    pub fn set_rate(
        &self,
        state: &LotState,
        category: VehicleCategory,
        rate: RateConfig,
    ) -> Transition<Option<RateConfig>> {
        let mut next = state.clone();
        let previous = next.rates.set(category, rate);
        Transition {
            state: next,
            outcome: previous,
        }
    }

    /// Append an entry on behalf of another module (store sale, expense, ...).
    pub fn record(&self, state: &LotState, transaction: Transaction) -> Transition<TransactionId> {
        let mut next = state.clone();
        let id = transaction.id.clone();
        tracing::info!(
            transaction_id = %id,
            kind = transaction.kind.as_str(),
            category = transaction.category.as_str(),
            amount = %transaction.amount,
            "transaction recorded"
        );
        next.transactions.append(transaction);
        Transition {
            state: next,
            outcome: id,
        }
    }
}

/// The label of `spot_id` and the ACTIVE ticket it holds.
fn active_ticket_on(state: &LotState, spot_id: SpotId) -> Result<(&str, &Ticket), SessionError> {
    let spot = state
        .spots
        .find(spot_id)
        .ok_or(SpotError::NotFound { spot_id })?;
    let ticket_id = spot
        .current_ticket()
        .ok_or(TicketError::NoActiveTicket { spot_id })?;
    let ticket = state.tickets.get(ticket_id).ok_or_else(|| TicketError::NotFound {
        ticket_id: ticket_id.clone(),
    })?;
    if !ticket.is_active() {
        return Err(TicketError::NotActive {
            ticket_id: ticket_id.clone(),
            status: ticket.status().name(),
        }
        .into());
    }
    Ok((spot.label(), ticket))
}

// ─── Tests ───────────────────────────────────────────────────────────
