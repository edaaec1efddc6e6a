//! Action dispatch errors.

use thiserror::Error;

/// Errors surfaced when dispatching a named action on an entity.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action is not a member of the current state's permitted set.
    /// Never recovered internally; propagates to the caller.
    #[error("action '{action}' is not legal in state '{state}'")]
    IllegalAction { state: String, action: String },

    /// The action's own guard rejected the call. No transition is applied.
    #[error("precondition failed for '{action}': {reason}")]
    PreconditionFailed { action: String, reason: String },

    /// The supplied argument payload does not match what the handler expects.
    #[error("invalid arguments for '{action}': expected {expected}")]
    InvalidArguments {
        action: String,
        expected: &'static str,
    },

    /// One or more contract term validators rejected the transaction.
    /// On the order path the just-applied transition has already been
    /// rolled back when this is returned.
    #[error(transparent)]
    Validation(#[from] crate::models::ValidationFailed),

    /// A recorded command could not be undone.
    #[error(transparent)]
    Command(#[from] crate::undo::CommandError),
}
