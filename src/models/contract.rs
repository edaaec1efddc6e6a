//! Contract entity: terms, parties and the signing lifecycle.

use crate::core::{
    ActionError, ActionTable, Actionable, SnapshotRecord, StateMachine, CANCEL_LAST_ACTION,
};
use crate::models::validator::TermFailure;
use crate::models::{Actor, Term, Transaction};
use crate::state_enum;
use crate::undo::{CommandHistory, DualTable, Undoable};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

state_enum! {
    pub enum ContractState {
        Edition => "edition",
        Signed => "signed",
        Published => "published",
        Canceled => "canceled",
    }
}

/// Contract payload: the owning actor, the parties to the agreement and
/// the ordered term list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContractData {
    pub owner: Option<Actor>,
    pub parties: Vec<Actor>,
    pub terms: Vec<Term>,
}

/// Contract action names.
pub mod action {
    pub const CHANGE_OWNERSHIP: &str = "change_ownership";
    pub const ADD_TERM: &str = "add_term";
    pub const REMOVE_TERM: &str = "remove_term";
    pub const ADD_PARTY: &str = "add_party";
    pub const REMOVE_PARTY: &str = "remove_party";
    pub const SIGN: &str = "sign";
    pub const PUBLISH: &str = "publish";
    pub const UNPUBLISH: &str = "unpublish";
    pub const CANCEL: &str = "cancel";
    pub const EDIT: &str = "edit";
}

/// Argument payload for contract actions.
#[derive(Clone, Debug)]
pub enum ContractArgs {
    None,
    Actor(Actor),
    Term(Term),
    Index(usize),
}

/// A contractual agreement between an owner and its parties, carrying the
/// terms that validate and price transactions executed against it.
///
/// State graph: `edition` (freely editable) → `sign` → `signed` →
/// `publish` → `published`; `cancel` is available everywhere but from
/// `canceled`, and `edit` reopens a canceled contract.
#[derive(Clone, Debug)]
pub struct Contract {
    machine: StateMachine<ContractState, ContractData>,
    history: CommandHistory<ContractArgs>,
}

static TABLE: ActionTable<Contract> = ActionTable::new(&[
    (
        "edition",
        &[
            (action::CHANGE_OWNERSHIP, Contract::apply_change_ownership),
            (action::ADD_TERM, Contract::apply_add_term),
            (action::REMOVE_TERM, Contract::apply_remove_term),
            (action::ADD_PARTY, Contract::apply_add_party),
            (action::REMOVE_PARTY, Contract::apply_remove_party),
            (action::CANCEL, Contract::apply_cancel),
            (action::SIGN, Contract::apply_sign),
        ],
    ),
    (
        "signed",
        &[
            (action::PUBLISH, Contract::apply_publish),
            (action::CANCEL, Contract::apply_cancel),
        ],
    ),
    (
        "published",
        &[
            (action::UNPUBLISH, Contract::apply_unpublish),
            (action::CANCEL, Contract::apply_cancel),
        ],
    ),
    ("canceled", &[(action::EDIT, Contract::apply_edit)]),
]);

// Domain transitions have no algebraic inverse; every action undoes by
// popping one snapshot.
static DUALS: DualTable = DualTable::new(&[
    (action::CHANGE_OWNERSHIP, CANCEL_LAST_ACTION),
    (action::ADD_TERM, CANCEL_LAST_ACTION),
    (action::REMOVE_TERM, CANCEL_LAST_ACTION),
    (action::ADD_PARTY, CANCEL_LAST_ACTION),
    (action::REMOVE_PARTY, CANCEL_LAST_ACTION),
    (action::SIGN, CANCEL_LAST_ACTION),
    (action::PUBLISH, CANCEL_LAST_ACTION),
    (action::UNPUBLISH, CANCEL_LAST_ACTION),
    (action::CANCEL, CANCEL_LAST_ACTION),
    (action::EDIT, CANCEL_LAST_ACTION),
]);

impl Contract {
    /// A fresh contract in `edition` with no owner, parties or terms.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(ContractState::Edition, ContractData::default()),
            history: CommandHistory::new(),
        }
    }

    /// Rebuild a contract from its serialized record. The restored
    /// contract has a single snapshot and an empty undo history; term
    /// hooks do not survive serialization.
    pub fn restore(record: SnapshotRecord<ContractState, ContractData>) -> Self {
        Self {
            machine: StateMachine::restore(record),
            history: CommandHistory::new(),
        }
    }

    pub fn state(&self) -> ContractState {
        *self.machine.state()
    }

    pub fn data(&self) -> &ContractData {
        self.machine.data()
    }

    pub fn owner(&self) -> Option<&Actor> {
        self.machine.data().owner.as_ref()
    }

    pub fn parties(&self) -> &[Actor] {
        &self.machine.data().parties
    }

    pub fn terms(&self) -> &[Term] {
        &self.machine.data().terms
    }

    /// Deep, JSON-safe copy of the current snapshot.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        self.machine.to_value()
    }

    /// Run every term's validate hook against `transaction`, collecting
    /// one failure per violated term without short-circuiting.
    pub fn validate_transaction(&self, transaction: &Transaction) -> Vec<TermFailure> {
        let mut failures = Vec::new();
        for (index, term) in self.terms().iter().enumerate() {
            let Some(validate) = term.validate_hook() else {
                continue;
            };
            if let Err(error) = validate(transaction) {
                tracing::debug!(index, term = %term.name, %error, "term validation failed");
                failures.push(TermFailure {
                    index,
                    term: term.name.clone(),
                    error,
                });
            }
        }
        failures
    }

    // Direct action surface. Applies immediately and is not recorded for
    // undo; use `do_action` for the recorded variant.

    pub fn change_ownership(&mut self, actor: Actor) -> Result<&mut Self, ActionError> {
        self.dispatch(action::CHANGE_OWNERSHIP, ContractArgs::Actor(actor))?;
        Ok(self)
    }

    pub fn add_term(&mut self, term: Term) -> Result<&mut Self, ActionError> {
        self.dispatch(action::ADD_TERM, ContractArgs::Term(term))?;
        Ok(self)
    }

    pub fn remove_term(&mut self, index: usize) -> Result<&mut Self, ActionError> {
        self.dispatch(action::REMOVE_TERM, ContractArgs::Index(index))?;
        Ok(self)
    }

    pub fn add_party(&mut self, actor: Actor) -> Result<&mut Self, ActionError> {
        self.dispatch(action::ADD_PARTY, ContractArgs::Actor(actor))?;
        Ok(self)
    }

    pub fn remove_party(&mut self, index: usize) -> Result<&mut Self, ActionError> {
        self.dispatch(action::REMOVE_PARTY, ContractArgs::Index(index))?;
        Ok(self)
    }

    pub fn sign(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::SIGN, ContractArgs::None)?;
        Ok(self)
    }

    pub fn publish(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::PUBLISH, ContractArgs::None)?;
        Ok(self)
    }

    pub fn unpublish(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::UNPUBLISH, ContractArgs::None)?;
        Ok(self)
    }

    pub fn cancel(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::CANCEL, ContractArgs::None)?;
        Ok(self)
    }

    pub fn edit(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::EDIT, ContractArgs::None)?;
        Ok(self)
    }

    /// Structural undo of the last action.
    pub fn cancel_last_action(&mut self) -> bool {
        self.machine.cancel_last_action()
    }

    /// Structural undo back to the creation snapshot.
    pub fn cancel_all_actions(&mut self) -> usize {
        self.machine.cancel_all_actions()
    }

    // Handlers.

    fn apply_change_ownership(&mut self, args: ContractArgs) -> Result<(), ActionError> {
        let ContractArgs::Actor(actor) = args else {
            return Err(invalid(action::CHANGE_OWNERSHIP, "actor"));
        };
        self.machine.update_data(|d| d.owner = Some(actor));
        Ok(())
    }

    fn apply_add_term(&mut self, args: ContractArgs) -> Result<(), ActionError> {
        let ContractArgs::Term(term) = args else {
            return Err(invalid(action::ADD_TERM, "term"));
        };
        self.machine.update_data(|d| d.terms.push(term));
        Ok(())
    }

    fn apply_remove_term(&mut self, args: ContractArgs) -> Result<(), ActionError> {
        let ContractArgs::Index(index) = args else {
            return Err(invalid(action::REMOVE_TERM, "index"));
        };
        if index >= self.terms().len() {
            return Err(ActionError::PreconditionFailed {
                action: action::REMOVE_TERM.into(),
                reason: format!("no term at index {index}"),
            });
        }
        self.machine.update_data(|d| {
            d.terms.remove(index);
        });
        Ok(())
    }

    fn apply_add_party(&mut self, args: ContractArgs) -> Result<(), ActionError> {
        let ContractArgs::Actor(actor) = args else {
            return Err(invalid(action::ADD_PARTY, "actor"));
        };
        self.machine.update_data(|d| d.parties.push(actor));
        Ok(())
    }

    fn apply_remove_party(&mut self, args: ContractArgs) -> Result<(), ActionError> {
        let ContractArgs::Index(index) = args else {
            return Err(invalid(action::REMOVE_PARTY, "index"));
        };
        if index >= self.parties().len() {
            return Err(ActionError::PreconditionFailed {
                action: action::REMOVE_PARTY.into(),
                reason: format!("no party at index {index}"),
            });
        }
        self.machine.update_data(|d| {
            d.parties.remove(index);
        });
        Ok(())
    }

    /// Signing requires an owner and at least one term. On precondition
    /// failure the error is raised and no transition is applied (there is
    /// nothing to roll back).
    fn apply_sign(&mut self, _args: ContractArgs) -> Result<(), ActionError> {
        let data = self.machine.data();
        if data.owner.is_none() {
            return Err(ActionError::PreconditionFailed {
                action: action::SIGN.into(),
                reason: "an owner for this contract must be defined".into(),
            });
        }
        if data.terms.is_empty() {
            return Err(ActionError::PreconditionFailed {
                action: action::SIGN.into(),
                reason: "at least one term must be defined to sign a contract".into(),
            });
        }
        self.machine.transition(ContractState::Signed, |_| {});
        Ok(())
    }

    fn apply_publish(&mut self, _args: ContractArgs) -> Result<(), ActionError> {
        self.machine.transition(ContractState::Published, |_| {});
        Ok(())
    }

    fn apply_unpublish(&mut self, _args: ContractArgs) -> Result<(), ActionError> {
        self.machine.transition(ContractState::Signed, |_| {});
        Ok(())
    }

    fn apply_cancel(&mut self, _args: ContractArgs) -> Result<(), ActionError> {
        self.machine.transition(ContractState::Canceled, |_| {});
        Ok(())
    }

    fn apply_edit(&mut self, _args: ContractArgs) -> Result<(), ActionError> {
        self.machine.transition(ContractState::Edition, |_| {});
        Ok(())
    }
}

fn invalid(action: &str, expected: &'static str) -> ActionError {
    ActionError::InvalidArguments {
        action: action.to_string(),
        expected,
    }
}

impl Default for Contract {
    fn default() -> Self {
        Self::new()
    }
}

impl Actionable for Contract {
    type State = ContractState;
    type Data = ContractData;
    type Args = ContractArgs;

    fn machine(&self) -> &StateMachine<ContractState, ContractData> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<ContractState, ContractData> {
        &mut self.machine
    }

    fn table() -> &'static ActionTable<Contract> {
        &TABLE
    }
}

impl Undoable for Contract {
    fn duals() -> &'static DualTable {
        &DUALS
    }

    fn history(&self) -> &CommandHistory<ContractArgs> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut CommandHistory<ContractArgs> {
        &mut self.history
    }
}

impl Serialize for Contract {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.machine.record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Contract {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = SnapshotRecord::<ContractState, ContractData>::deserialize(deserializer)?;
        Ok(Contract::restore(record))
    }
}

/// Concatenated term blocks, matching [`Term`]'s rendering.
impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in self.terms() {
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Actionable;
    use crate::undo::Undoable;

    fn signable() -> Contract {
        let mut contract = Contract::new();
        contract
            .change_ownership(Actor::new("John"))
            .unwrap()
            .add_term(Term::new("Term"))
            .unwrap();
        contract
    }

    #[test]
    fn new_contract_starts_in_edition() {
        let contract = Contract::new();
        assert_eq!(contract.state(), ContractState::Edition);
        assert!(contract.owner().is_none());
        assert!(contract.parties().is_empty());
        assert!(contract.terms().is_empty());
    }

    #[test]
    fn edition_actions_mutate_data_without_leaving_edition() {
        let mut contract = Contract::new();
        contract
            .change_ownership(Actor::new("John"))
            .unwrap()
            .add_party(Actor::new("William"))
            .unwrap()
            .add_term(Term::new("First"))
            .unwrap()
            .add_term(Term::new("Second"))
            .unwrap()
            .remove_term(0)
            .unwrap();

        assert_eq!(contract.state(), ContractState::Edition);
        assert_eq!(contract.owner().unwrap().name(), "John");
        assert_eq!(contract.parties().len(), 1);
        assert_eq!(contract.terms().len(), 1);
        assert_eq!(contract.terms()[0].name, "Second");
    }

    #[test]
    fn sign_requires_an_owner() {
        let mut contract = Contract::new();
        contract.add_term(Term::new("Term")).unwrap();

        let err = contract.sign().unwrap_err();
        assert!(matches!(err, ActionError::PreconditionFailed { .. }));
        assert_eq!(contract.state(), ContractState::Edition);
    }

    #[test]
    fn sign_requires_at_least_one_term() {
        let mut contract = Contract::new();
        contract.change_ownership(Actor::new("John")).unwrap();

        let err = contract.sign().unwrap_err();
        assert!(matches!(err, ActionError::PreconditionFailed { .. }));
        assert_eq!(contract.state(), ContractState::Edition);
    }

    #[test]
    fn lifecycle_edition_signed_published() {
        let mut contract = signable();
        contract.sign().unwrap().publish().unwrap();
        assert_eq!(contract.state(), ContractState::Published);

        contract.unpublish().unwrap();
        assert_eq!(contract.state(), ContractState::Signed);
    }

    #[test]
    fn canceled_contract_can_reopen_via_edit() {
        let mut contract = signable();
        contract.sign().unwrap().cancel().unwrap();
        assert_eq!(contract.state(), ContractState::Canceled);

        contract.edit().unwrap();
        assert_eq!(contract.state(), ContractState::Edition);
    }

    #[test]
    fn actions_outside_the_current_state_are_illegal() {
        let mut contract = Contract::new();

        let err = contract.publish().unwrap_err();
        match err {
            ActionError::IllegalAction { state, action } => {
                assert_eq!(state, "edition");
                assert_eq!(action, "publish");
            }
            other => panic!("expected IllegalAction, got {other:?}"),
        }

        contract.change_ownership(Actor::new("J")).unwrap();
        contract.add_term(Term::new("T")).unwrap();
        contract.sign().unwrap();
        assert!(contract.add_term(Term::new("U")).is_err());
    }

    #[test]
    fn cancel_all_actions_walks_back_to_creation() {
        let mut contract = signable();
        contract.sign().unwrap();

        contract.cancel_all_actions();
        assert_eq!(contract.state(), ContractState::Edition);
        assert!(contract.owner().is_none());
        assert!(contract.terms().is_empty());
    }

    #[test]
    fn do_action_records_an_undoable_command() {
        let mut contract = Contract::new();
        contract
            .do_action(action::ADD_TERM, ContractArgs::Term(Term::new("T")))
            .unwrap();
        assert_eq!(contract.terms().len(), 1);

        assert!(contract.undo().unwrap());
        assert!(contract.terms().is_empty());

        assert!(contract.redo().unwrap());
        assert_eq!(contract.terms().len(), 1);
    }

    #[test]
    fn do_and_direct_call_produce_identical_data() {
        let term = Term::new("T").describe("d");

        let mut direct = Contract::new();
        direct.add_term(term.clone()).unwrap();

        let mut recorded = Contract::new();
        recorded
            .do_action(action::ADD_TERM, ContractArgs::Term(term))
            .unwrap();

        let lhs = direct.to_value().unwrap();
        let rhs = recorded.to_value().unwrap();
        assert_eq!(lhs["terms"], rhs["terms"]);
        assert_eq!(lhs["state"], rhs["state"]);
    }

    #[test]
    fn serialization_round_trips_and_resets_history() {
        let mut contract = signable();
        contract.sign().unwrap();

        let value = serde_json::to_value(&contract).unwrap();
        let restored: Contract = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(serde_json::to_value(&restored).unwrap(), value);
        assert_eq!(restored.state(), ContractState::Signed);
        assert!(restored.history().is_empty());
        // No previous chain on a restored entity.
        assert_eq!(restored.machine().depth(), 1);
    }
}
