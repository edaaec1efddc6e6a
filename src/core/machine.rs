//! State machine value owning an entity's snapshot chain.
//!
//! The machine is deliberately small: it knows nothing about actions or
//! undo commands. It owns the current [`Snapshot`] and offers the one path
//! by which that snapshot changes (`transition`), plus structural undo by
//! walking the `previous` chain.

use super::snapshot::{Snapshot, SnapshotRecord};
use super::state::{EntityData, State};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Owns exactly one current snapshot at a time.
///
/// Prior snapshots are reachable only through the `previous` chain, which
/// exists for as long as structural undo is possible.
///
/// # Example
///
/// ```rust
/// use accord::core::StateMachine;
/// use accord::state_enum;
/// use serde::{Deserialize, Serialize};
///
/// state_enum! {
///     enum LampState {
///         Off => "off",
///         On => "on",
///     }
/// }
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct LampData {
///     switched: u32,
/// }
///
/// let mut machine = StateMachine::new(LampState::Off, LampData { switched: 0 });
/// machine.transition(LampState::On, |d| d.switched += 1);
/// assert_eq!(machine.state_name(), "on");
///
/// machine.cancel_last_action();
/// assert_eq!(machine.state_name(), "off");
/// assert_eq!(machine.data().switched, 0);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine<S: State, D: EntityData> {
    snapshot: Snapshot<S, D>,
}

impl<S: State, D: EntityData> StateMachine<S, D> {
    /// Create a machine at its creation snapshot.
    pub fn new(state: S, data: D) -> Self {
        Self {
            snapshot: Snapshot::initial(state, data),
        }
    }

    /// Rebuild a machine from a persisted record.
    ///
    /// The restored machine holds a single snapshot: no `previous` chain,
    /// so structural undo is not possible past the restore point.
    pub fn restore(record: SnapshotRecord<S, D>) -> Self {
        Self {
            snapshot: Snapshot::restored(record),
        }
    }

    /// The current state.
    pub fn state(&self) -> &S {
        self.snapshot.state()
    }

    /// The current state's name.
    pub fn state_name(&self) -> &'static str {
        self.snapshot.state().name()
    }

    /// The current data payload.
    pub fn data(&self) -> &D {
        self.snapshot.data()
    }

    /// When the current snapshot was produced.
    pub fn updated(&self) -> DateTime<Utc> {
        self.snapshot.updated()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &Snapshot<S, D> {
        &self.snapshot
    }

    /// Number of snapshots in the chain (creation snapshot included).
    pub fn depth(&self) -> usize {
        self.snapshot.depth()
    }

    /// Move to `state`, deriving the new payload from a copy of the current
    /// one. This is the only path by which the current snapshot changes.
    pub fn transition(&mut self, state: S, update: impl FnOnce(&mut D)) -> &mut Self {
        let mut data = self.snapshot.data().clone();
        update(&mut data);
        tracing::trace!(
            from = self.state_name(),
            to = state.name(),
            "state transition"
        );
        self.snapshot.advance(state, data);
        self
    }

    /// Re-enter the current state with a merged payload: a no-op transition
    /// used for pure data mutation. Still produces a snapshot, so the
    /// mutation is individually undoable.
    pub fn update_data(&mut self, update: impl FnOnce(&mut D)) -> &mut Self {
        let state = self.snapshot.state().clone();
        self.transition(state, update)
    }

    /// Re-enter the current state with a replaced payload.
    pub fn set_data(&mut self, data: D) -> &mut Self {
        self.update_data(|d| *d = data)
    }

    /// Reinstate the snapshot the current one superseded.
    ///
    /// Returns `false` (no-op) when already at the creation snapshot.
    pub fn cancel_last_action(&mut self) -> bool {
        self.snapshot.pop()
    }

    /// Reinstate snapshots until only the creation snapshot remains.
    /// Returns the number of snapshots discarded.
    pub fn cancel_all_actions(&mut self) -> usize {
        let mut discarded = 0;
        while self.snapshot.pop() {
            discarded += 1;
        }
        discarded
    }

    /// Detachable copy of the current state and data.
    pub fn record(&self) -> SnapshotRecord<S, D> {
        self.snapshot.record()
    }

    /// Deep, JSON-safe copy of the current snapshot (state, timestamp and
    /// flattened data payload).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.record())
    }
}
