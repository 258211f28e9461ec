//! # Shared Lot
//!
//! One lot served by several terminals. Entry and exit read and then write
//! spot occupancy, so two terminals acting on the same spot must not
//! interleave. `SharedLot` runs each coordinator operation under a single
//! lock and swaps in the resulting state.
//!
//! Persistence is not done under the lock. [`SharedLot::apply`] hands back
//! a copy of the committed state for the caller to write out.

use parking_lot::Mutex;

use crate::lot::LotState;
use crate::session::Transition;

/// A [`LotState`] behind a mutex.
#[derive(Debug, Default)]
pub struct SharedLot {
    state: Mutex<LotState>,
}

impl SharedLot {
    pub fn new(state: LotState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> LotState {
        self.state.lock().clone()
    }

    /// Run `op` against the current state and install its result.
    ///
    /// On error nothing is installed. On success the returned
    /// [`Transition`] holds the outcome and a copy of the state that was
    /// committed, for the caller to persist once the lock is gone.
    pub fn apply<T, E, F>(&self, op: F) -> Result<Transition<T>, E>
    where
        F: FnOnce(&LotState) -> Result<Transition<T>, E>,
    {
        let mut guard = self.state.lock();
        let transition = op(&guard)?;
        *guard = transition.state.clone();
        drop(guard);
        Ok(transition)
    }

    pub fn into_inner(self) -> LotState {
        self.state.into_inner()
    }
}
