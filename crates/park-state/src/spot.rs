//! # Spot Registry
//!
//! Owns the physical spots of the lot and the backlink from an occupied
//! spot to its ticket.
//!
//! ## States
//!
//! ```text
//! Free ──mark_occupied(ticket)──▶ Occupied(ticket)
//!   ▲                                  │
//!   └───────────mark_free()────────────┘
//! ```
//!
//! Occupancy is a tagged variant, so "occupied without a ticket" and
//! "free but holding a ticket" cannot be represented. Stored documents
//! with either shape are rejected on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use park_core::{SpotId, TicketId, VehicleCategory};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from spot registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpotError {
    /// No spot with this id.
    #[error("spot {spot_id} not found")]
    NotFound {
        /// The missing spot.
        spot_id: SpotId,
    },

    /// The spot already holds a ticket.
    #[error("spot {spot_id} is already occupied by ticket {ticket_id}")]
    AlreadyOccupied {
        /// The occupied spot.
        spot_id: SpotId,
        /// The ticket currently holding it.
        ticket_id: TicketId,
    },

    /// A shrink would remove a spot that holds an active ticket.
    #[error("cannot remove spot {spot_id}: occupied by ticket {ticket_id}")]
    OccupiedSpotRemoval {
        /// The occupied spot in the removal range.
        spot_id: SpotId,
        /// The ticket holding it.
        ticket_id: TicketId,
    },

    /// A lot must keep at least one spot.
    #[error("invalid spot count {requested}: at least one spot is required")]
    InvalidCapacity {
        /// The requested total.
        requested: usize,
    },
}

// ─── Spot ────────────────────────────────────────────────────────────

/// Whether a spot is free or which ticket occupies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[deny(missing_docs)]
pub enum Occupancy {
    /// No vehicle parked.
    Free,
    /// Held by the given ACTIVE ticket.
    Occupied(TicketId),
}

/// One physical parking space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpotRecord", into = "SpotRecord")]
pub struct ParkingSpot {
    id: SpotId,
    label: String,
    category: VehicleCategory,
    occupancy: Occupancy,
}

impl ParkingSpot {
    /// A free spot.
    pub fn new(id: SpotId, label: impl Into<String>, category: VehicleCategory) -> Self {
        Self {
            id,
            label: label.into(),
            category,
            occupancy: Occupancy::Free,
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The vehicle category the spot is sized for.
    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self.occupancy, Occupancy::Occupied(_))
    }

    /// The occupying ticket, if any.
    pub fn current_ticket(&self) -> Option<&TicketId> {
        match &self.occupancy {
            Occupancy::Occupied(t) => Some(t),
            Occupancy::Free => None,
        }
    }
}

/// Stored shape of a spot (`isOccupied` flag plus optional `ticketId`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpotRecord {
    id: SpotId,
    label: String,
    #[serde(rename = "type")]
    category: VehicleCategory,
    is_occupied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ticket_id: Option<TicketId>,
}

impl TryFrom<SpotRecord> for ParkingSpot {
    type Error = String;

    fn try_from(r: SpotRecord) -> Result<Self, Self::Error> {
        let occupancy = match (r.is_occupied, r.ticket_id) {
            (true, Some(t)) => Occupancy::Occupied(t),
            (false, None) => Occupancy::Free,
            (true, None) => return Err(format!("spot {} is occupied without a ticket", r.id)),
            (false, Some(t)) => {
                return Err(format!("spot {} is free but references ticket {t}", r.id))
            }
        };
        Ok(Self {
            id: r.id,
            label: r.label,
            category: r.category,
            occupancy,
        })
    }
}

impl From<ParkingSpot> for SpotRecord {
    fn from(s: ParkingSpot) -> Self {
        let is_occupied = s.is_occupied();
        let ticket_id = match s.occupancy {
            Occupancy::Occupied(t) => Some(t),
            Occupancy::Free => None,
        };
        Self {
            id: s.id,
            label: s.label,
            category: s.category,
            is_occupied,
            ticket_id,
        }
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Spots added and removed by a resize.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResizeOutcome {
    pub added: Vec<SpotId>,
    pub removed: Vec<SpotId>,
}

/// The ordered set of spots. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ParkingSpot>", into = "Vec<ParkingSpot>")]
pub struct SpotRegistry {
    spots: Vec<ParkingSpot>,
}

impl SpotRegistry {
    /// A fresh lot of `count` free spots labelled `V-1..V-count`.
    ///
    /// The first `moto_count` spots are sized for motorcycles, the rest for cars.
    pub fn with_layout(count: usize, moto_count: usize) -> Self {
        let spots = (1..=count)
            .map(|i| {
                let category = if i <= moto_count {
                    VehicleCategory::Moto
                } else {
                    VehicleCategory::Car
                };
                ParkingSpot::new(SpotId(position_id(i)), format!("V-{i}"), category)
            })
            .collect();
        Self { spots }
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParkingSpot> {
        self.spots.iter()
    }

    pub fn occupied_count(&self) -> usize {
        self.spots.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn find(&self, spot_id: SpotId) -> Option<&ParkingSpot> {
        self.spots.iter().find(|s| s.id == spot_id)
    }

    pub fn find_by_ticket(&self, ticket_id: &TicketId) -> Option<&ParkingSpot> {
        self.spots
            .iter()
            .find(|s| s.current_ticket() == Some(ticket_id))
    }

    /// Grow or shrink to `new_count` spots.
    ///
    /// Growth appends free spots of `category` with fresh ids. Shrinking
    /// removes from the end and is rejected outright if any spot in the
    /// removal range is occupied.
    pub fn resize(
        &mut self,
        new_count: usize,
        category: VehicleCategory,
    ) -> Result<ResizeOutcome, SpotError> {
        if new_count == 0 {
            return Err(SpotError::InvalidCapacity { requested: 0 });
        }

        let mut outcome = ResizeOutcome::default();
        if new_count < self.spots.len() {
            let blocked = self.spots[new_count..].iter().find_map(|s| match &s.occupancy {
                Occupancy::Occupied(t) => Some((s.id, t.clone())),
                Occupancy::Free => None,
            });
            if let Some((spot_id, ticket_id)) = blocked {
                return Err(SpotError::OccupiedSpotRemoval { spot_id, ticket_id });
            }
            outcome.removed = self.spots[new_count..].iter().map(|s| s.id).collect();
            self.spots.truncate(new_count);
        } else {
            let mut next_id = self.next_id();
            while self.spots.len() < new_count {
                let position = self.spots.len() + 1;
                self.spots
                    .push(ParkingSpot::new(next_id, format!("V-{position}"), category));
                outcome.added.push(next_id);
                next_id = next_id.next();
            }
        }
        Ok(outcome)
    }

    /// Bind `ticket_id` to a free spot.
    pub fn mark_occupied(&mut self, spot_id: SpotId, ticket_id: TicketId) -> Result<(), SpotError> {
        let spot = self.find_mut(spot_id)?;
        if let Occupancy::Occupied(current) = &spot.occupancy {
            return Err(SpotError::AlreadyOccupied {
                spot_id,
                ticket_id: current.clone(),
            });
        }
        spot.occupancy = Occupancy::Occupied(ticket_id);
        Ok(())
    }

    /// Release a spot, returning the ticket it held. Freeing a free spot is a no-op.
    pub fn mark_free(&mut self, spot_id: SpotId) -> Result<Option<TicketId>, SpotError> {
        let spot = self.find_mut(spot_id)?;
        match std::mem::replace(&mut spot.occupancy, Occupancy::Free) {
            Occupancy::Occupied(t) => Ok(Some(t)),
            Occupancy::Free => Ok(None),
        }
    }

    fn find_mut(&mut self, spot_id: SpotId) -> Result<&mut ParkingSpot, SpotError> {
        self.spots
            .iter_mut()
            .find(|s| s.id == spot_id)
            .ok_or(SpotError::NotFound { spot_id })
    }

    fn next_id(&self) -> SpotId {
        self.spots
            .iter()
            .map(|s| s.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(SpotId(1))
    }
}

fn position_id(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

impl TryFrom<Vec<ParkingSpot>> for SpotRegistry {
    type Error = String;

    fn try_from(spots: Vec<ParkingSpot>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::new();
        for s in &spots {
            if !seen.insert(s.id) {
                return Err(format!("duplicate spot id {}", s.id));
            }
        }
        Ok(Self { spots })
    }
}

impl From<SpotRegistry> for Vec<ParkingSpot> {
    fn from(r: SpotRegistry) -> Self {
        r.spots
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TicketId {
        TicketId::from_string(s)
    }

    #[test]
    fn test_default_layout() {
        let r = SpotRegistry::with_layout(30, 5);
        assert_eq!(r.len(), 30);
        assert_eq!(r.find(SpotId(1)).unwrap().label(), "V-1");
        assert_eq!(r.find(SpotId(5)).unwrap().category(), VehicleCategory::Moto);
        assert_eq!(r.find(SpotId(6)).unwrap().category(), VehicleCategory::Car);
        assert_eq!(r.occupied_count(), 0);
    }

    #[test]
    fn test_mark_occupied_and_free() {
        let mut r = SpotRegistry::with_layout(3, 0);
        r.mark_occupied(SpotId(2), tid("T1")).unwrap();
        let spot = r.find(SpotId(2)).unwrap();
        assert!(spot.is_occupied());
        assert_eq!(spot.current_ticket(), Some(&tid("T1")));
        assert_eq!(r.find_by_ticket(&tid("T1")).unwrap().id(), SpotId(2));

        assert_eq!(r.mark_free(SpotId(2)).unwrap(), Some(tid("T1")));
        assert!(!r.find(SpotId(2)).unwrap().is_occupied());
        assert!(r.find_by_ticket(&tid("T1")).is_none());
    }

    #[test]
    fn test_mark_occupied_twice_rejected() {
        let mut r = SpotRegistry::with_layout(1, 0);
        r.mark_occupied(SpotId(1), tid("T1")).unwrap();
        let err = r.mark_occupied(SpotId(1), tid("T2")).unwrap_err();
        assert_eq!(
            err,
            SpotError::AlreadyOccupied {
                spot_id: SpotId(1),
                ticket_id: tid("T1")
            }
        );
        assert_eq!(r.find(SpotId(1)).unwrap().current_ticket(), Some(&tid("T1")));
    }

    #[test]
    fn test_unknown_spot() {
        let mut r = SpotRegistry::with_layout(1, 0);
        assert!(matches!(
            r.mark_occupied(SpotId(9), tid("T")),
            Err(SpotError::NotFound { .. })
        ));
        assert!(matches!(r.mark_free(SpotId(9)), Err(SpotError::NotFound { .. })));
        assert!(r.find(SpotId(9)).is_none());
    }

    #[test]
    fn test_mark_free_is_idempotent() {
        let mut r = SpotRegistry::with_layout(1, 0);
        assert_eq!(r.mark_free(SpotId(1)).unwrap(), None);
    }

    #[test]
    fn test_grow_assigns_fresh_ids_and_labels() {
        let mut r = SpotRegistry::with_layout(2, 0);
        let outcome = r.resize(4, VehicleCategory::Van).unwrap();
        assert_eq!(outcome.added, vec![SpotId(3), SpotId(4)]);
        assert_eq!(r.find(SpotId(4)).unwrap().label(), "V-4");
        assert_eq!(r.find(SpotId(4)).unwrap().category(), VehicleCategory::Van);
    }

    #[test]
    fn test_grow_after_shrink_does_not_reuse_live_ids() {
        let mut r = SpotRegistry::with_layout(3, 0);
        r.resize(2, VehicleCategory::Car).unwrap();
        r.resize(3, VehicleCategory::Car).unwrap();
        let ids: Vec<SpotId> = r.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![SpotId(1), SpotId(2), SpotId(3)]);
    }

    #[test]
    fn test_shrink_removes_from_end() {
        let mut r = SpotRegistry::with_layout(5, 0);
        let outcome = r.resize(3, VehicleCategory::Car).unwrap();
        assert_eq!(outcome.removed, vec![SpotId(4), SpotId(5)]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_shrink_over_occupied_spot_rejected() {
        let mut r = SpotRegistry::with_layout(5, 0);
        r.mark_occupied(SpotId(4), tid("T4")).unwrap();
        let before = r.clone();
        let err = r.resize(3, VehicleCategory::Car).unwrap_err();
        assert_eq!(
            err,
            SpotError::OccupiedSpotRemoval {
                spot_id: SpotId(4),
                ticket_id: tid("T4")
            }
        );
        assert_eq!(r, before);
    }

    #[test]
    fn test_resize_to_zero_rejected() {
        let mut r = SpotRegistry::with_layout(2, 0);
        assert_eq!(
            r.resize(0, VehicleCategory::Car).unwrap_err(),
            SpotError::InvalidCapacity { requested: 0 }
        );
    }

    #[test]
    fn test_stored_shape() {
        let mut r = SpotRegistry::with_layout(2, 1);
        r.mark_occupied(SpotId(2), tid("ABC")).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"label":"V-1","type":"MOTO","isOccupied":false},{"id":2,"label":"V-2","type":"CAR","isOccupied":true,"ticketId":"ABC"}]"#
        );
        let back: SpotRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_inconsistent_stored_spot_rejected() {
        let occupied_no_ticket = r#"[{"id":1,"label":"V-1","type":"CAR","isOccupied":true}]"#;
        assert!(serde_json::from_str::<SpotRegistry>(occupied_no_ticket).is_err());
        let free_with_ticket =
            r#"[{"id":1,"label":"V-1","type":"CAR","isOccupied":false,"ticketId":"X"}]"#;
        assert!(serde_json::from_str::<SpotRegistry>(free_with_ticket).is_err());
    }

    #[test]
    fn test_duplicate_spot_ids_rejected() {
        let json = r#"[{"id":1,"label":"A","type":"CAR","isOccupied":false},{"id":1,"label":"B","type":"CAR","isOccupied":false}]"#;
        assert!(serde_json::from_str::<SpotRegistry>(json).is_err());
    }
}
