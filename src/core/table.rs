//! Explicit per-state action dispatch.
//!
//! Instead of installing and removing callables on an entity as its state
//! changes, each entity declares one static [`ActionTable`]: a mapping from
//! state name to the exhaustive and exclusive set of actions legal in that
//! state. Whether an action is currently callable is an explicit query
//! (`can_perform`), and dispatching an unlisted action is a distinguishable
//! error, never a silent no-op.

use super::error::ActionError;
use super::machine::StateMachine;
use super::state::{EntityData, State};

/// Structural undo: reinstate the snapshot before the last action.
/// Always dispatchable, regardless of the current state's table row.
pub const CANCEL_LAST_ACTION: &str = "cancel_last_action";

/// Structural undo back to the creation snapshot.
pub const CANCEL_ALL_ACTIONS: &str = "cancel_all_actions";

/// Handler for one named action on entity `E`.
pub type Handler<E> = fn(&mut E, <E as Actionable>::Args) -> Result<(), ActionError>;

/// Static mapping from `(state, action)` to a handler.
///
/// Terminal states appear with an empty (or reduced) row; states absent
/// from the table expose no actions at all.
pub struct ActionTable<E: Actionable> {
    states: &'static [(&'static str, &'static [(&'static str, Handler<E>)])],
}

impl<E: Actionable> ActionTable<E> {
    /// Build a table from static rows.
    pub const fn new(
        states: &'static [(&'static str, &'static [(&'static str, Handler<E>)])],
    ) -> Self {
        Self { states }
    }

    /// Find the handler for `action` in `state`, if legal there.
    pub fn lookup(&self, state: &str, action: &str) -> Option<Handler<E>> {
        self.states
            .iter()
            .find(|(name, _)| *name == state)
            .and_then(|(_, actions)| {
                actions
                    .iter()
                    .find(|(name, _)| *name == action)
                    .map(|(_, handler)| *handler)
            })
    }

    /// Whether `action` is a member of `state`'s permitted set.
    pub fn can_perform(&self, state: &str, action: &str) -> bool {
        self.lookup(state, action).is_some()
    }

    /// The action names legal in `state`, in declaration order.
    pub fn actions_in(&self, state: &str) -> Vec<&'static str> {
        self.states
            .iter()
            .find(|(name, _)| *name == state)
            .map(|(_, actions)| actions.iter().map(|(name, _)| *name).collect())
            .unwrap_or_default()
    }
}

/// Glue between a domain entity and its action table.
///
/// Implementors expose their [`StateMachine`] and table; the provided
/// `dispatch` resolves built-in structural-undo actions first, then the
/// table row for the current state.
pub trait Actionable: Sized + 'static {
    type State: State;
    type Data: EntityData;

    /// Argument payload carried by this entity's actions. Cloned into
    /// recorded commands so they can be replayed.
    type Args: Clone + std::fmt::Debug;

    fn machine(&self) -> &StateMachine<Self::State, Self::Data>;
    fn machine_mut(&mut self) -> &mut StateMachine<Self::State, Self::Data>;
    fn table() -> &'static ActionTable<Self>;

    /// Whether `action` may be dispatched right now.
    fn can_perform(&self, action: &str) -> bool {
        action == CANCEL_LAST_ACTION
            || action == CANCEL_ALL_ACTIONS
            || Self::table().can_perform(self.machine().state_name(), action)
    }

    /// Invoke a named action against the current state's table.
    ///
    /// Applies immediately and is not recorded for undo; see
    /// [`Undoable::do_action`](crate::undo::Undoable::do_action) for the
    /// recorded variant. Both paths produce identical resulting data.
    fn dispatch(&mut self, action: &str, args: Self::Args) -> Result<(), ActionError> {
        match action {
            CANCEL_LAST_ACTION => {
                self.machine_mut().cancel_last_action();
                Ok(())
            }
            CANCEL_ALL_ACTIONS => {
                self.machine_mut().cancel_all_actions();
                Ok(())
            }
            _ => {
                let state = self.machine().state_name();
                let handler =
                    Self::table()
                        .lookup(state, action)
                        .ok_or_else(|| ActionError::IllegalAction {
                            state: state.to_string(),
                            action: action.to_string(),
                        })?;
                tracing::trace!(state, action, "dispatching action");
                handler(self, args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use serde::{Deserialize, Serialize};

    state_enum! {
        enum GateState {
            Open => "open",
            Shut => "shut",
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct GateData {
        passes: u32,
    }

    struct Gate {
        machine: StateMachine<GateState, GateData>,
    }

    impl Gate {
        fn new() -> Self {
            Self {
                machine: StateMachine::new(GateState::Open, GateData { passes: 0 }),
            }
        }

        fn apply_pass(&mut self, _args: ()) -> Result<(), ActionError> {
            self.machine.update_data(|d| d.passes += 1);
            Ok(())
        }

        fn apply_shut(&mut self, _args: ()) -> Result<(), ActionError> {
            self.machine.transition(GateState::Shut, |_| {});
            Ok(())
        }
    }

    static TABLE: ActionTable<Gate> = ActionTable::new(&[
        ("open", &[("pass", Gate::apply_pass), ("shut", Gate::apply_shut)]),
        ("shut", &[]),
    ]);

    impl Actionable for Gate {
        type State = GateState;
        type Data = GateData;
        type Args = ();

        fn machine(&self) -> &StateMachine<GateState, GateData> {
            &self.machine
        }

        fn machine_mut(&mut self) -> &mut StateMachine<GateState, GateData> {
            &mut self.machine
        }

        fn table() -> &'static ActionTable<Gate> {
            &TABLE
        }
    }

    #[test]
    fn dispatch_runs_the_listed_handler() {
        let mut gate = Gate::new();
        gate.dispatch("pass", ()).unwrap();
        gate.dispatch("pass", ()).unwrap();

        assert_eq!(gate.machine.data().passes, 2);
    }

    #[test]
    fn dispatch_rejects_actions_absent_from_the_current_state() {
        let mut gate = Gate::new();
        gate.dispatch("shut", ()).unwrap();

        let err = gate.dispatch("pass", ()).unwrap_err();
        match err {
            ActionError::IllegalAction { state, action } => {
                assert_eq!(state, "shut");
                assert_eq!(action, "pass");
            }
            other => panic!("expected IllegalAction, got {other:?}"),
        }
    }

    #[test]
    fn builtin_cancel_is_always_dispatchable() {
        let mut gate = Gate::new();
        gate.dispatch("shut", ()).unwrap();
        gate.dispatch(CANCEL_LAST_ACTION, ()).unwrap();

        assert_eq!(gate.machine.state_name(), "open");
    }

    #[test]
    fn can_perform_reflects_the_table() {
        let mut gate = Gate::new();
        assert!(gate.can_perform("pass"));
        assert!(gate.can_perform(CANCEL_LAST_ACTION));

        gate.dispatch("shut", ()).unwrap();
        assert!(!gate.can_perform("pass"));
    }

    #[test]
    fn tables_are_addressable_for_the_static_lifetime() {
        // Entities are owned values; the trait guarantees their tables can
        // be held as plain `&'static` references.
        fn table_of<E: Actionable>() -> &'static ActionTable<E> {
            E::table()
        }

        assert!(table_of::<Gate>().can_perform("open", "pass"));
    }

    #[test]
    fn actions_in_lists_declared_order() {
        assert_eq!(TABLE.actions_in("open"), vec!["pass", "shut"]);
        assert!(TABLE.actions_in("shut").is_empty());
        assert!(TABLE.actions_in("unknown").is_empty());
    }
}
