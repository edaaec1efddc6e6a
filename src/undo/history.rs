//! Position-addressable, truncating undo/redo stack.

use super::command::Command;

/// Ordered sequence of commands plus a cursor at the last executed one.
///
/// `cursor` is `None` at the bottom of history (nothing to undo) and
/// `Some(i)` when `commands[i]` was the last command executed. Recording a
/// new command after undoing truncates everything past the cursor: the
/// abandoned redo branch is discarded and can never be resurrected, the
/// classic linear undo/redo of editors.
#[derive(Clone, Debug)]
pub struct CommandHistory<A> {
    commands: Vec<Command<A>>,
    cursor: Option<usize>,
}

impl<A> Default for CommandHistory<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> CommandHistory<A> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            cursor: None,
        }
    }

    /// Number of retained commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether any command is retained.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Position of the last executed command, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Append an executed command, discarding the redo branch first.
    pub fn record(&mut self, mut command: Command<A>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.commands.truncate(keep);
        command.mark_executed(true);
        self.commands.push(command);
        self.cursor = Some(self.commands.len() - 1);
    }

    /// The command `undo()` would revert, if any.
    pub fn command_to_undo(&self) -> Option<&Command<A>> {
        self.cursor.map(|c| &self.commands[c])
    }

    /// The command `redo()` would re-execute, if any.
    pub fn command_to_redo(&self) -> Option<&Command<A>> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.commands.get(next)
    }

    /// Move the cursor back one command, marking it undone.
    ///
    /// Callers dispatch the inverse action first; this only adjusts the
    /// bookkeeping.
    pub fn step_back(&mut self) {
        if let Some(c) = self.cursor {
            self.commands[c].mark_executed(false);
            self.cursor = c.checked_sub(1);
        }
    }

    /// Move the cursor forward one command, marking it executed.
    pub fn step_forward(&mut self) {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.commands.len() {
            self.commands[next].mark_executed(true);
            self.cursor = Some(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(n: &str) -> Command<i32> {
        Command::new(n, 1, Some("cancel_last_action"), 0)
    }

    #[test]
    fn new_history_has_no_cursor() {
        let history: CommandHistory<i32> = CommandHistory::new();
        assert!(history.is_empty());
        assert!(history.cursor().is_none());
        assert!(history.command_to_undo().is_none());
        assert!(history.command_to_redo().is_none());
    }

    #[test]
    fn record_advances_the_cursor() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));
        history.record(cmd("b"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.command_to_undo().unwrap().execute_action(), "b");
    }

    #[test]
    fn step_back_and_forward_move_the_cursor() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));
        history.record(cmd("b"));

        history.step_back();
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.command_to_redo().unwrap().execute_action(), "b");
        assert!(!history.commands[1].executed());

        history.step_forward();
        assert_eq!(history.cursor(), Some(1));
        assert!(history.commands[1].executed());
    }

    #[test]
    fn step_back_at_bottom_is_a_no_op() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));
        history.step_back();
        assert!(history.cursor().is_none());

        history.step_back();
        assert!(history.cursor().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn step_forward_at_top_is_a_no_op() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));

        history.step_forward();
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn recording_mid_history_discards_the_redo_branch() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));
        history.record(cmd("b"));
        history.step_back();

        history.record(cmd("c"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.commands[0].execute_action(), "a");
        assert_eq!(history.commands[1].execute_action(), "c");
        assert_eq!(history.cursor(), Some(1));
        assert!(history.command_to_redo().is_none());
    }

    #[test]
    fn recording_at_the_bottom_discards_everything() {
        let mut history = CommandHistory::new();
        history.record(cmd("a"));
        history.record(cmd("b"));
        history.step_back();
        history.step_back();

        history.record(cmd("c"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.commands[0].execute_action(), "c");
        assert_eq!(history.cursor(), Some(0));
    }
}
