//! Dual-action wiring: turning dispatched actions into reversible commands.

use super::command::Command;
use super::history::CommandHistory;
use crate::core::{ActionError, Actionable};

/// Static mapping from an action name to its declared inverse.
///
/// The inverse of every state-transition action defaults to
/// [`CANCEL_LAST_ACTION`](crate::core::CANCEL_LAST_ACTION): most domain
/// transitions have no well-defined algebraic inverse, while popping one
/// snapshot off the chain is always available and restores exactly the
/// state the entity was in before the action ran.
pub struct DualTable {
    pairs: &'static [(&'static str, &'static str)],
}

impl DualTable {
    /// Build a table from static pairs.
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    /// The declared inverse of `action`, if any.
    pub fn dual_of(&self, action: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(name, _)| *name == action)
            .map(|(_, dual)| *dual)
    }
}

/// Recorded, reversible action dispatch over an [`Actionable`] entity.
///
/// `do_action` applies an action exactly like
/// [`dispatch`](Actionable::dispatch) and additionally records a
/// [`Command`] pairing it with its declared inverse, so the call can be
/// undone and redone. Both call paths produce identical resulting data.
pub trait Undoable: Actionable {
    /// The entity's action-to-inverse mapping.
    fn duals() -> &'static DualTable;

    fn history(&self) -> &CommandHistory<Self::Args>;
    fn history_mut(&mut self) -> &mut CommandHistory<Self::Args>;

    /// Apply `action` and record it for undo, reusing the execute arguments
    /// as inverse arguments.
    ///
    /// The right default for the common cases: state-transition actions
    /// invert via snapshot pop (arguments ignored), and symmetric data
    /// actions take the same payload both ways. Use [`do_action_with`]
    /// when the inverse needs different arguments.
    ///
    /// [`do_action_with`]: Undoable::do_action_with
    fn do_action(&mut self, action: &str, args: Self::Args) -> Result<(), ActionError> {
        let undo_args = args.clone();
        self.do_action_with(action, args, undo_args)
    }

    /// Apply `action` and record it for undo with explicit inverse
    /// arguments.
    ///
    /// The command is undoable iff the dual table declares an inverse for
    /// `action`. Nothing is recorded when the action itself fails.
    fn do_action_with(
        &mut self,
        action: &str,
        args: Self::Args,
        undo_args: Self::Args,
    ) -> Result<(), ActionError> {
        let undo_action = Self::duals().dual_of(action);
        self.dispatch(action, args.clone())?;

        let command = Command::new(action, args, undo_action, undo_args);
        tracing::debug!(action, undoable = command.undoable(), "recorded command");
        self.history_mut().record(command);
        Ok(())
    }

    /// Revert the last executed command by dispatching its inverse.
    ///
    /// Returns `Ok(false)` at the bottom of history (a silent no-op, not an
    /// error). Fails with [`CommandError::NotUndoable`] when the command
    /// was recorded without an inverse.
    ///
    /// [`CommandError::NotUndoable`]: super::CommandError::NotUndoable
    fn undo(&mut self) -> Result<bool, ActionError> {
        let (action, args) = {
            let Some(command) = self.history().command_to_undo() else {
                return Ok(false);
            };
            let (action, args) = command.undo_instruction()?;
            (action.to_string(), args.clone())
        };

        self.dispatch(&action, args)?;
        self.history_mut().step_back();
        tracing::debug!(action, "command undone");
        Ok(true)
    }

    /// Re-execute the command just past the cursor.
    ///
    /// Returns `Ok(false)` at the top of history.
    fn redo(&mut self) -> Result<bool, ActionError> {
        let (action, args) = {
            let Some(command) = self.history().command_to_redo() else {
                return Ok(false);
            };
            (
                command.execute_action().to_string(),
                command.execute_args().clone(),
            )
        };

        self.dispatch(&action, args)?;
        self.history_mut().step_forward();
        tracing::debug!(action, "command redone");
        Ok(true)
    }
}
