//! Generalized undo/redo command engine.
//!
//! Every action dispatched through [`Undoable::do_action`] is recorded as a
//! [`Command`] pairing the action with its declared inverse, so any state
//! transition or data mutation can be rolled back or replayed. Histories
//! are linear: executing after undoing discards the abandoned redo branch.

mod command;
mod error;
mod history;
mod undoable;

pub use command::Command;
pub use error::CommandError;
pub use history::CommandHistory;
pub use undoable::{DualTable, Undoable};
