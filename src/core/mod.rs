//! Core state machinery.
//!
//! This module contains the generic, domain-free half of the crate:
//! - State definitions via the [`State`] trait and [`state_enum!`](crate::state_enum)
//! - Immutable [`Snapshot`] chains (an entity's own append-only history)
//! - The [`StateMachine`] value owning the current snapshot
//! - Explicit per-state action dispatch via [`ActionTable`] / [`Actionable`]

mod error;
mod machine;
pub mod macros;
mod snapshot;
mod state;
mod table;

pub use error::ActionError;
pub use machine::StateMachine;
pub use snapshot::{Snapshot, SnapshotRecord};
pub use state::{EntityData, State};
pub use table::{ActionTable, Actionable, Handler, CANCEL_ALL_ACTIONS, CANCEL_LAST_ACTION};
