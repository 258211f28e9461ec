//! # Lot State
//!
//! The four collections the occupancy engine reads and writes, held
//! together as one value. Coordinator operations take a `&LotState` and
//! return a new one, so a reader never sees a half-applied transition.
//!
//! [`LotState::violations`] checks the cross-collection invariants:
//!
//! - an occupied spot references an ACTIVE ticket parked on that spot;
//! - every ACTIVE ticket is parked on a spot that references it back;
//! - at most one ACTIVE ticket per spot.
//!
//! Violations are reported, never repaired.

use std::collections::HashMap;

use thiserror::Error;

use park_billing::RateTable;
use park_core::{SpotId, TicketId};

use crate::ledger::TransactionLog;
use crate::spot::{ParkingSpot, SpotRegistry};
use crate::ticket::TicketLedger;

/// A broken cross-collection invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[deny(missing_docs)]
pub enum InvariantViolation {
    /// An occupied spot points at a ticket the ledger does not have.
    #[error("spot {spot_id} references unknown ticket {ticket_id}")]
    DanglingTicket {
        /// The occupied spot.
        spot_id: SpotId,
        /// The missing ticket.
        ticket_id: TicketId,
    },

    /// An occupied spot points at a PAID or CANCELLED ticket.
    #[error("spot {spot_id} references ticket {ticket_id} which is {status}")]
    ClosedTicketOnSpot {
        /// The occupied spot.
        spot_id: SpotId,
        /// The closed ticket.
        ticket_id: TicketId,
        /// The ticket's status name.
        status: &'static str,
    },

    /// A spot holds a ticket that records a different spot.
    #[error("spot {spot_id} references ticket {ticket_id} parked on {ticket_spot:?}")]
    SpotMismatch {
        /// The spot holding the ticket.
        spot_id: SpotId,
        /// The held ticket.
        ticket_id: TicketId,
        /// The spot the ticket itself records.
        ticket_spot: Option<SpotId>,
    },

    /// An ACTIVE ticket that no spot holds.
    #[error("active ticket {ticket_id} is not held by any spot")]
    OrphanActiveTicket {
        /// The unheld ticket.
        ticket_id: TicketId,
    },

    /// More than one ACTIVE ticket records the same spot.
    #[error("spot {spot_id} has {count} active tickets")]
    MultipleActiveTickets {
        /// The contested spot.
        spot_id: SpotId,
        /// Number of ACTIVE tickets on it.
        count: usize,
    },
}

/// Spots, tickets, transactions, and rates of one lot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LotState {
    pub spots: SpotRegistry,
    pub tickets: TicketLedger,
    pub transactions: TransactionLog,
    pub rates: RateTable,
}

impl LotState {
    /// An empty lot with the default layout and tariff.
    pub fn fresh(spot_count: usize, moto_count: usize, rates: RateTable) -> Self {
        Self {
            spots: SpotRegistry::with_layout(spot_count, moto_count),
            tickets: TicketLedger::default(),
            transactions: TransactionLog::default(),
            rates,
        }
    }

    /// Every invariant the collections currently break.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        let mut found = Vec::new();

        for spot in self.spots.iter() {
            let Some(ticket_id) = spot.current_ticket() else {
                continue;
            };
            match self.tickets.get(ticket_id) {
                None => found.push(InvariantViolation::DanglingTicket {
                    spot_id: spot.id(),
                    ticket_id: ticket_id.clone(),
                }),
                Some(t) if !t.is_active() => found.push(InvariantViolation::ClosedTicketOnSpot {
                    spot_id: spot.id(),
                    ticket_id: ticket_id.clone(),
                    status: t.status().name(),
                }),
                Some(t) if t.spot_id() != Some(spot.id()) => {
                    found.push(InvariantViolation::SpotMismatch {
                        spot_id: spot.id(),
                        ticket_id: ticket_id.clone(),
                        ticket_spot: t.spot_id(),
                    })
                }
                Some(_) => {}
            }
        }

        let mut per_spot: HashMap<SpotId, usize> = HashMap::new();
        for t in self.tickets.active() {
            if self.spots.find_by_ticket(t.id()).is_none() {
                found.push(InvariantViolation::OrphanActiveTicket {
                    ticket_id: t.id().clone(),
                });
            }
            if let Some(spot_id) = t.spot_id() {
                *per_spot.entry(spot_id).or_default() += 1;
            }
        }
        let mut crowded: Vec<(SpotId, usize)> =
            per_spot.into_iter().filter(|(_, n)| *n > 1).collect();
        crowded.sort();
        found.extend(
            crowded
                .into_iter()
                .map(|(spot_id, count)| InvariantViolation::MultipleActiveTickets { spot_id, count }),
        );

        found
    }

    /// `Ok` if no invariant is broken.
    pub fn verify(&self) -> Result<(), Vec<InvariantViolation>> {
        let v = self.violations();
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }

    /// Spots whose label contains `term` (case-insensitive), or whose
    /// occupying ticket's plate or id contains it.
    pub fn search(&self, term: &str) -> Vec<&ParkingSpot> {
        let term = term.trim();
        if term.is_empty() {
            return self.spots.iter().collect();
        }
        let lower = term.to_lowercase();
        let upper = term.to_uppercase();
        self.spots
            .iter()
            .filter(|spot| {
                if spot.label().to_lowercase().contains(&lower) {
                    return true;
                }
                spot.current_ticket()
                    .and_then(|id| self.tickets.get(id))
                    .is_some_and(|t| {
                        t.plate().contains(&upper) || t.id().as_str().to_uppercase().contains(&upper)
                    })
            })
            .collect()
    }
}
