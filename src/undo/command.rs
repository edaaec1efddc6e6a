//! One reversible unit of work.

use super::error::CommandError;

/// A recorded action invocation paired with its declared inverse.
///
/// Commands are plain data: the action name and arguments to re-execute,
/// and the inverse action name and arguments to undo. They are bound to
/// exactly one subject through the [`CommandHistory`](super::CommandHistory)
/// that owns them, and are replayed by dispatching the stored names on that
/// subject.
#[derive(Clone, Debug)]
pub struct Command<A> {
    execute_action: String,
    execute_args: A,
    undo_action: Option<String>,
    undo_args: A,
    executed: bool,
}

impl<A> Command<A> {
    /// Build a command. It is undoable iff an inverse action is supplied.
    pub fn new(
        execute_action: impl Into<String>,
        execute_args: A,
        undo_action: Option<&str>,
        undo_args: A,
    ) -> Self {
        Self {
            execute_action: execute_action.into(),
            execute_args,
            undo_action: undo_action.map(str::to_string),
            undo_args,
            executed: false,
        }
    }

    /// The action name to (re-)execute.
    pub fn execute_action(&self) -> &str {
        &self.execute_action
    }

    /// The arguments to (re-)execute with.
    pub fn execute_args(&self) -> &A {
        &self.execute_args
    }

    /// The declared inverse action, if any.
    pub fn undo_action(&self) -> Option<&str> {
        self.undo_action.as_deref()
    }

    /// Whether an inverse action was supplied.
    pub fn undoable(&self) -> bool {
        self.undo_action.is_some()
    }

    /// Whether the command is currently in the executed state.
    pub fn executed(&self) -> bool {
        self.executed
    }

    pub(crate) fn mark_executed(&mut self, executed: bool) {
        self.executed = executed;
    }

    /// The inverse action name and arguments, or why undo is impossible.
    pub fn undo_instruction(&self) -> Result<(&str, &A), CommandError> {
        let action = self
            .undo_action
            .as_deref()
            .ok_or(CommandError::NotUndoable)?;
        if !self.executed {
            return Err(CommandError::NeverExecuted);
        }
        Ok((action, &self.undo_args))
    }
}
