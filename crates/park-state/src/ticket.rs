//! # Ticket Lifecycle
//!
//! Owns every ticket the lot has issued, open and closed.
//!
//! ## States
//!
//! ```text
//! Active ──close(exit, amount, method)──▶ Paid      (terminal)
//!    │
//!    └──────cancel()────────────────────▶ Cancelled (terminal)
//! ```
//!
//! Settlement data (exit time, amount, payment method) lives inside the
//! `Paid` variant, so it exists exactly when the ticket is paid. Closed
//! tickets are never modified again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use park_core::{Amount, PaymentMethod, SpotId, TicketId, Timestamp, VehicleCategory};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from ticket lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// No ticket with this id.
    #[error("ticket {ticket_id} not found")]
    NotFound {
        /// The missing ticket.
        ticket_id: TicketId,
    },

    /// The ticket is already closed.
    #[error("ticket {ticket_id} is {status}, not ACTIVE")]
    NotActive {
        /// The closed ticket.
        ticket_id: TicketId,
        /// Its current status name.
        status: &'static str,
    },

    /// The spot holds no active ticket to close.
    #[error("spot {spot_id} has no active ticket")]
    NoActiveTicket {
        /// The spot that was asked to check out.
        spot_id: SpotId,
    },

    /// Plate is empty after trimming.
    #[error("license plate must not be empty")]
    InvalidPlate,

    /// Closing instant precedes the ticket's entry.
    #[error("ticket {ticket_id}: exit {exit} precedes entry {entry}")]
    ExitBeforeEntry {
        ticket_id: TicketId,
        entry: Timestamp,
        exit: Timestamp,
    },
}

// ─── Status ──────────────────────────────────────────────────────────

/// Payment recorded when a ticket is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub exit_time: Timestamp,
    pub total_amount: Amount,
    pub payment_method: Option<PaymentMethod>,
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Active,
    Paid(Settlement),
    Cancelled,
}

impl TicketStatus {
    /// Canonical status name (`ACTIVE`, `PAID`, `CANCELLED`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paid(_) => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Ticket ──────────────────────────────────────────────────────────

/// One vehicle's stay, from entry to paid exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketRecord", into = "TicketRecord")]
pub struct Ticket {
    id: TicketId,
    plate: String,
    category: VehicleCategory,
    model: Option<String>,
    entry_time: Timestamp,
    spot_id: Option<SpotId>,
    status: TicketStatus,
}

impl Ticket {
    pub fn id(&self) -> &TicketId {
        &self.id
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    /// Vehicle model, if recorded at entry.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn entry_time(&self) -> Timestamp {
        self.entry_time
    }

    pub fn spot_id(&self) -> Option<SpotId> {
        self.spot_id
    }

    pub fn status(&self) -> &TicketStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.status {
            TicketStatus::Paid(s) => Some(s),
            _ => None,
        }
    }

    pub fn exit_time(&self) -> Option<Timestamp> {
        self.settlement().map(|s| s.exit_time)
    }

    pub fn total_amount(&self) -> Option<Amount> {
        self.settlement().map(|s| s.total_amount)
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.settlement().and_then(|s| s.payment_method)
    }

    fn require_active(&self) -> Result<(), TicketError> {
        if self.status.is_active() {
            Ok(())
        } else {
            Err(TicketError::NotActive {
                ticket_id: self.id.clone(),
                status: self.status.name(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum StatusTag {
    Active,
    Paid,
    Cancelled,
}

/// Stored shape of a ticket: flat optional fields plus a status tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketRecord {
    id: TicketId,
    plate: String,
    vehicle_type: VehicleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    entry_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit_time: Option<Timestamp>,
    status: StatusTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spot_id: Option<SpotId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_method: Option<PaymentMethod>,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = String;

    fn try_from(r: TicketRecord) -> Result<Self, Self::Error> {
        let status = match r.status {
            StatusTag::Paid => {
                let (Some(exit_time), Some(total_amount)) = (r.exit_time, r.total_amount) else {
                    return Err(format!(
                        "ticket {} is PAID without exit time and amount",
                        r.id
                    ));
                };
                if exit_time < r.entry_time {
                    return Err(format!("ticket {} exits before it enters", r.id));
                }
                TicketStatus::Paid(Settlement {
                    exit_time,
                    total_amount,
                    payment_method: r.payment_method,
                })
            }
            tag => {
                if r.exit_time.is_some() || r.total_amount.is_some() || r.payment_method.is_some() {
                    return Err(format!(
                        "ticket {} carries settlement data but is not PAID",
                        r.id
                    ));
                }
                match tag {
                    StatusTag::Cancelled => TicketStatus::Cancelled,
                    _ => TicketStatus::Active,
                }
            }
        };
        Ok(Self {
            id: r.id,
            plate: r.plate,
            category: r.vehicle_type,
            model: r.model,
            entry_time: r.entry_time,
            spot_id: r.spot_id,
            status,
        })
    }
}

impl From<Ticket> for TicketRecord {
    fn from(t: Ticket) -> Self {
        let (status, exit_time, total_amount, payment_method) = match t.status {
            TicketStatus::Active => (StatusTag::Active, None, None, None),
            TicketStatus::Cancelled => (StatusTag::Cancelled, None, None, None),
            TicketStatus::Paid(s) => (
                StatusTag::Paid,
                Some(s.exit_time),
                Some(s.total_amount),
                s.payment_method,
            ),
        };
        Self {
            id: t.id,
            plate: t.plate,
            vehicle_type: t.category,
            model: t.model,
            entry_time: t.entry_time,
            exit_time,
            status,
            spot_id: t.spot_id,
            total_amount,
            payment_method,
        }
    }
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// All tickets in issue order. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Ticket>", into = "Vec<Ticket>")]
pub struct TicketLedger {
    tickets: Vec<Ticket>,
}

impl TicketLedger {
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Ticket> {
        self.tickets.iter()
    }

    pub fn active(&self) -> impl DoubleEndedIterator<Item = &Ticket> {
        self.tickets.iter().filter(|t| t.is_active())
    }

    pub fn get(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == ticket_id)
    }

    /// The open ticket parked on `spot_id`, if any.
    pub fn active_ticket_for_spot(&self, spot_id: SpotId) -> Option<&Ticket> {
        self.active().find(|t| t.spot_id == Some(spot_id))
    }

    /// Issue a new ACTIVE ticket. The plate is trimmed and upper-cased.
    pub fn open(
        &mut self,
        plate: &str,
        category: VehicleCategory,
        spot_id: Option<SpotId>,
        model: Option<String>,
        now: Timestamp,
    ) -> Result<&Ticket, TicketError> {
        let plate = normalize_plate(plate).ok_or(TicketError::InvalidPlate)?;
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let mut id = TicketId::new();
        while self.get(&id).is_some() {
            id = TicketId::new();
        }

        self.tickets.push(Ticket {
            id,
            plate,
            category,
            model,
            entry_time: now,
            spot_id,
            status: TicketStatus::Active,
        });
        let index = self.tickets.len() - 1;
        Ok(&self.tickets[index])
    }

    /// Settle an ACTIVE ticket (ACTIVE → PAID).
    pub fn close(
        &mut self,
        ticket_id: &TicketId,
        exit_time: Timestamp,
        amount: Amount,
        payment_method: PaymentMethod,
    ) -> Result<&Ticket, TicketError> {
        let ticket = self.find_mut(ticket_id)?;
        ticket.require_active()?;
        if exit_time < ticket.entry_time {
            return Err(TicketError::ExitBeforeEntry {
                ticket_id: ticket_id.clone(),
                entry: ticket.entry_time,
                exit: exit_time,
            });
        }
        ticket.status = TicketStatus::Paid(Settlement {
            exit_time,
            total_amount: amount,
            payment_method: Some(payment_method),
        });
        Ok(&*ticket)
    }

    /// Void an ACTIVE ticket without charge (ACTIVE → CANCELLED).
    pub fn cancel(&mut self, ticket_id: &TicketId) -> Result<&Ticket, TicketError> {
        let ticket = self.find_mut(ticket_id)?;
        ticket.require_active()?;
        ticket.status = TicketStatus::Cancelled;
        Ok(&*ticket)
    }

    fn find_mut(&mut self, ticket_id: &TicketId) -> Result<&mut Ticket, TicketError> {
        self.tickets
            .iter_mut()
            .find(|t| &t.id == ticket_id)
            .ok_or_else(|| TicketError::NotFound {
                ticket_id: ticket_id.clone(),
            })
    }
}

/// Trimmed, upper-cased plate, or `None` if nothing is left.
pub fn normalize_plate(plate: &str) -> Option<String> {
    let p = plate.trim().to_uppercase();
    if p.is_empty() {
        None
    } else {
        Some(p)
    }
}

impl TryFrom<Vec<Ticket>> for TicketLedger {
    type Error = String;

    fn try_from(tickets: Vec<Ticket>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::new();
        for t in &tickets {
            if !seen.insert(&t.id) {
                return Err(format!("duplicate ticket id {}", t.id));
            }
        }
        Ok(Self { tickets })
    }
}

impl From<TicketLedger> for Vec<Ticket> {
    fn from(l: TicketLedger) -> Self {
        l.tickets
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(ms: i64) -> Timestamp {
        Timestamp::from_millis(1_767_225_600_000 + ms).unwrap()
    }

    fn amount() -> Amount {
        Amount::new(dec!(15)).unwrap()
    }

    fn open_one(ledger: &mut TicketLedger) -> TicketId {
        ledger
            .open(" abc1d23 ", VehicleCategory::Car, Some(SpotId(3)), None, at(0))
            .unwrap()
            .id()
            .clone()
    }

    #[test]
    fn test_open_creates_active_ticket() {
        let mut l = TicketLedger::default();
        let id = open_one(&mut l);
        let t = l.get(&id).unwrap();
        assert_eq!(t.plate(), "ABC1D23");
        assert!(t.is_active());
        assert_eq!(t.entry_time(), at(0));
        assert!(t.exit_time().is_none());
        assert!(t.total_amount().is_none());
        assert_eq!(l.active_ticket_for_spot(SpotId(3)).unwrap().id(), &id);
    }

    #[test]
    fn test_open_rejects_blank_plate() {
        let mut l = TicketLedger::default();
        let err = l
            .open("   ", VehicleCategory::Car, Some(SpotId(1)), None, at(0))
            .unwrap_err();
        assert_eq!(err, TicketError::InvalidPlate);
        assert!(l.is_empty());
    }

    #[test]
    fn test_open_drops_blank_model() {
        let mut l = TicketLedger::default();
        let t = l
            .open("X1", VehicleCategory::Van, None, Some("  ".into()), at(0))
            .unwrap();
        assert!(t.model().is_none());
    }

    #[test]
    fn test_close_settles_ticket() {
        let mut l = TicketLedger::default();
        let id = open_one(&mut l);
        let t = l.close(&id, at(61_000), amount(), PaymentMethod::Pix).unwrap();
        assert_eq!(t.status().name(), "PAID");
        assert_eq!(t.exit_time(), Some(at(61_000)));
        assert_eq!(t.total_amount(), Some(amount()));
        assert_eq!(t.payment_method(), Some(PaymentMethod::Pix));
        assert!(l.active_ticket_for_spot(SpotId(3)).is_none());
    }

    #[test]
    fn test_closed_ticket_is_immutable() {
        let mut l = TicketLedger::default();
        let id = open_one(&mut l);
        l.close(&id, at(1), amount(), PaymentMethod::Cash).unwrap();
        let before = l.clone();
        let err = l.close(&id, at(2), amount(), PaymentMethod::Cash).unwrap_err();
        assert_eq!(
            err,
            TicketError::NotActive {
                ticket_id: id.clone(),
                status: "PAID"
            }
        );
        assert!(l.cancel(&id).is_err());
        assert_eq!(l, before);
    }

    #[test]
    fn test_close_unknown_ticket() {
        let mut l = TicketLedger::default();
        let err = l
            .close(&TicketId::from_string("nope"), at(1), amount(), PaymentMethod::Cash)
            .unwrap_err();
        assert!(matches!(err, TicketError::NotFound { .. }));
    }

    #[test]
    fn test_close_before_entry_rejected() {
        let mut l = TicketLedger::default();
        let id = l
            .open("P", VehicleCategory::Car, Some(SpotId(1)), None, at(10_000))
            .unwrap()
            .id()
            .clone();
        let err = l.close(&id, at(0), amount(), PaymentMethod::Cash).unwrap_err();
        assert!(matches!(err, TicketError::ExitBeforeEntry { .. }));
        assert!(l.get(&id).unwrap().is_active());
    }

    #[test]
    fn test_cancel() {
        let mut l = TicketLedger::default();
        let id = open_one(&mut l);
        let t = l.cancel(&id).unwrap();
        assert_eq!(*t.status(), TicketStatus::Cancelled);
        assert!(t.exit_time().is_none());
        assert!(t.total_amount().is_none());
    }

    #[test]
    fn test_iterates_newest_first_in_reverse() {
        let mut l = TicketLedger::default();
        let first = open_one(&mut l);
        let second = l
            .open("DEF4G56", VehicleCategory::Car, Some(SpotId(4)), None, at(1_000))
            .unwrap()
            .id()
            .clone();
        let third = l
            .open("GHI7J89", VehicleCategory::Moto, Some(SpotId(5)), None, at(2_000))
            .unwrap()
            .id()
            .clone();
        l.cancel(&second).unwrap();

        let newest_first: Vec<&TicketId> = l.iter().rev().map(|t| t.id()).collect();
        assert_eq!(newest_first, vec![&third, &second, &first]);
        let active: Vec<&TicketId> = l.active().rev().map(|t| t.id()).collect();
        assert_eq!(active, vec![&third, &first]);
    }

    #[test]
    fn test_stored_shape_of_paid_ticket() {
        let json = r#"{"id":"K3J9X2ABQ","plate":"ABC1234","vehicleType":"CAR","entryTime":1767225600000,"exitTime":1767229260000,"status":"PAID","spotId":7,"totalAmount":15.0,"paymentMethod":"CASH"}"#;
        let t: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(t.total_amount().unwrap().value(), dec!(15));
        assert_eq!(t.spot_id(), Some(SpotId(7)));
        assert_eq!(serde_json::to_string(&t).unwrap(), json);
    }

    #[test]
    fn test_paid_without_amount_rejected() {
        let json = r#"{"id":"A","plate":"P","vehicleType":"CAR","entryTime":1,"exitTime":2,"status":"PAID"}"#;
        assert!(serde_json::from_str::<Ticket>(json).is_err());
    }

    #[test]
    fn test_active_with_exit_time_rejected() {
        let json = r#"{"id":"A","plate":"P","vehicleType":"CAR","entryTime":1,"exitTime":2,"status":"ACTIVE"}"#;
        assert!(serde_json::from_str::<Ticket>(json).is_err());
    }

    #[test]
    fn test_duplicate_ticket_ids_rejected() {
        let json = r#"[{"id":"A","plate":"P","vehicleType":"CAR","entryTime":1,"status":"ACTIVE"},{"id":"A","plate":"Q","vehicleType":"CAR","entryTime":2,"status":"CANCELLED"}]"#;
        assert!(serde_json::from_str::<TicketLedger>(json).is_err());
    }
}
