//! Command engine errors.

use thiserror::Error;

/// Errors raised by [`Command`](super::Command) bookkeeping.
///
/// Running out of history is not represented here: `undo()`/`redo()` at the
/// boundary are silent no-ops, since navigating past the edges is expected
/// during interactive use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command was recorded without an inverse action.
    #[error("command is not undoable")]
    NotUndoable,

    /// The command is not in the executed state (already undone, or never
    /// run).
    #[error("command has not been executed")]
    NeverExecuted,
}
