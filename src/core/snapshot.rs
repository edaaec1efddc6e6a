//! Immutable state snapshots linked into an append-only chain.
//!
//! Every successful action replaces an entity's current snapshot with a new
//! one whose `previous` field references the prior snapshot. The chain is the
//! entity's own structural history: popping one entry restores exactly the
//! state and data the entity had before the last action ran.

use super::state::{EntityData, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable point in an entity's history.
///
/// A snapshot captures the state identifier, the full data payload and the
/// moment it was produced. Snapshots are never mutated after construction;
/// the owning machine swaps the whole value on every transition.
///
/// The `previous` chain is exclusively owned: no two entities share a tail,
/// and the chain is rooted at the entity's creation snapshot.
#[derive(Clone, Debug)]
pub struct Snapshot<S: State, D: EntityData> {
    state: S,
    data: D,
    updated: DateTime<Utc>,
    previous: Option<Box<Snapshot<S, D>>>,
}

impl<S: State, D: EntityData> Snapshot<S, D> {
    /// Create a creation snapshot with no predecessor, stamped "now".
    pub fn initial(state: S, data: D) -> Self {
        Self {
            state,
            data,
            updated: Utc::now(),
            previous: None,
        }
    }

    /// Rebuild a snapshot from persisted data.
    ///
    /// The timestamp is taken from the record rather than the clock, and the
    /// restored snapshot has no predecessor: restored entities start their
    /// history fresh.
    pub fn restored(record: SnapshotRecord<S, D>) -> Self {
        Self {
            state: record.state,
            data: record.data,
            updated: record.updated,
            previous: None,
        }
    }

    /// Replace `self` with a successor snapshot, linking the old value as
    /// `previous`. The timestamp is set to "now".
    pub(crate) fn advance(&mut self, state: S, data: D) {
        let prior = std::mem::replace(
            self,
            Snapshot {
                state,
                data,
                updated: Utc::now(),
                previous: None,
            },
        );
        self.previous = Some(Box::new(prior));
    }

    /// Discard the current snapshot and reinstate its predecessor.
    ///
    /// Returns `false` (leaving the snapshot untouched) when already at the
    /// creation snapshot.
    pub(crate) fn pop(&mut self) -> bool {
        match self.previous.take() {
            Some(prior) => {
                *self = *prior;
                true
            }
            None => false,
        }
    }

    /// The state identifier captured by this snapshot.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The data payload captured by this snapshot.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// When this snapshot was produced (or the persisted timestamp, for
    /// restored snapshots).
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// The snapshot this one superseded, if any.
    pub fn previous(&self) -> Option<&Snapshot<S, D>> {
        self.previous.as_deref()
    }

    /// Number of snapshots in the chain, including this one.
    pub fn depth(&self) -> usize {
        let mut count = 1;
        let mut cursor = self.previous.as_deref();
        while let Some(snapshot) = cursor {
            count += 1;
            cursor = snapshot.previous.as_deref();
        }
        count
    }

    /// Detachable, JSON-safe copy of this snapshot's state and data.
    pub fn record(&self) -> SnapshotRecord<S, D> {
        SnapshotRecord {
            state: self.state.clone(),
            updated: self.updated,
            data: self.data.clone(),
        }
    }
}

/// The serialized form of a snapshot: the state identifier, the update
/// timestamp and the data payload flattened into one JSON object.
///
/// The state is stored exactly once, so the "payload state matches the
/// snapshot id" invariant holds structurally.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SnapshotRecord<S: State, D: EntityData> {
    pub state: S,
    pub updated: DateTime<Utc>,
    #[serde(flatten)]
    pub data: D,
}
