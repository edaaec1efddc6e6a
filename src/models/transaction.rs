//! Transaction entity: execution of a contract by a set of orderers.

use crate::core::{
    ActionError, ActionTable, Actionable, SnapshotRecord, StateMachine, CANCEL_LAST_ACTION,
};
use crate::ledger::{Ledger, LedgerError};
use crate::models::validator::ValidationFailed;
use crate::models::{Actor, Contract};
use crate::state_enum;
use crate::undo::{CommandHistory, DualTable, Undoable};
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

state_enum! {
    pub enum TransactionState {
        Created => "created",
        Ordered => "ordered",
        Completed => "completed",
        Canceled => "canceled",
    }
    terminal: [Completed, Canceled]
}

/// Transaction payload: the contract being executed, who ordered it and
/// the lifecycle timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionData {
    pub contract: Contract,
    pub orderers: Vec<Actor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
}

/// Transaction action names.
pub mod action {
    pub const ORDER: &str = "order";
    pub const COMPLETE: &str = "complete";
    pub const CANCEL: &str = "cancel";
}

/// Argument payload for transaction actions.
#[derive(Clone, Debug)]
pub enum TransactionArgs {
    None,
    Orderers(Vec<Actor>),
}

/// An execution of a contract.
///
/// State graph: `created` → `order` → `ordered` → `complete` →
/// `completed`; `cancel` leads to `canceled` from any live state.
/// `completed` and `canceled` are terminal.
///
/// Ordering is validated against every term of the contract; on any
/// violation the just-applied transition is rolled back before the error
/// surfaces, so a rejected order leaves the transaction in `created`.
#[derive(Clone, Debug)]
pub struct Transaction {
    machine: StateMachine<TransactionState, TransactionData>,
    history: CommandHistory<TransactionArgs>,
}

static TABLE: ActionTable<Transaction> = ActionTable::new(&[
    (
        "created",
        &[
            (action::ORDER, Transaction::apply_order),
            (action::CANCEL, Transaction::apply_cancel),
        ],
    ),
    (
        "ordered",
        &[
            (action::COMPLETE, Transaction::apply_complete),
            (action::CANCEL, Transaction::apply_cancel),
        ],
    ),
    ("completed", &[]),
    ("canceled", &[]),
]);

static DUALS: DualTable = DualTable::new(&[
    (action::ORDER, CANCEL_LAST_ACTION),
    (action::COMPLETE, CANCEL_LAST_ACTION),
    (action::CANCEL, CANCEL_LAST_ACTION),
]);

impl Transaction {
    /// A fresh transaction in `created`, executing `contract`.
    pub fn new(contract: Contract) -> Self {
        Self {
            machine: StateMachine::new(
                TransactionState::Created,
                TransactionData {
                    contract,
                    orderers: Vec::new(),
                    ordered: None,
                    completed: None,
                },
            ),
            history: CommandHistory::new(),
        }
    }

    /// Rebuild a transaction from its serialized record, with a single
    /// snapshot and an empty undo history. The embedded contract's term
    /// hooks do not survive serialization.
    pub fn restore(record: SnapshotRecord<TransactionState, TransactionData>) -> Self {
        Self {
            machine: StateMachine::restore(record),
            history: CommandHistory::new(),
        }
    }

    pub fn state(&self) -> TransactionState {
        *self.machine.state()
    }

    pub fn data(&self) -> &TransactionData {
        self.machine.data()
    }

    pub fn contract(&self) -> &Contract {
        &self.machine.data().contract
    }

    pub fn orderers(&self) -> &[Actor] {
        &self.machine.data().orderers
    }

    pub fn ordered(&self) -> Option<DateTime<Utc>> {
        self.machine.data().ordered
    }

    pub fn completed(&self) -> Option<DateTime<Utc>> {
        self.machine.data().completed
    }

    /// Deep, JSON-safe copy of the current snapshot.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        self.machine.to_value()
    }

    /// Run every contract term's validate hook against this transaction.
    pub fn validate(&self) -> Result<(), ValidationFailed> {
        let failures = self.contract().validate_transaction(self);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed::new(failures))
        }
    }

    /// Run the contract's pricing rules and return the resulting ledger.
    ///
    /// The ledger is freshly built on every call; a failing rule or an
    /// unbalanced row yields an error and no ledger at all.
    pub fn compute_price(&self) -> Result<Ledger, LedgerError> {
        Ledger::compute(self)
    }

    // Direct action surface.

    pub fn order(&mut self, orderers: Vec<Actor>) -> Result<&mut Self, ActionError> {
        self.dispatch(action::ORDER, TransactionArgs::Orderers(orderers))?;
        Ok(self)
    }

    pub fn complete(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::COMPLETE, TransactionArgs::None)?;
        Ok(self)
    }

    pub fn cancel(&mut self) -> Result<&mut Self, ActionError> {
        self.dispatch(action::CANCEL, TransactionArgs::None)?;
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

    /// Transition to `ordered`, then validate against every contract term.
    /// On failure the transition is popped before the error is returned,
    /// so no partial order is ever observable.
    fn apply_order(&mut self, args: TransactionArgs) -> Result<(), ActionError> {
        let TransactionArgs::Orderers(orderers) = args else {
            return Err(ActionError::InvalidArguments {
                action: action::ORDER.into(),
                expected: "orderers",
            });
        };

        let now = Utc::now();
        self.machine.transition(TransactionState::Ordered, |d| {
            d.orderers = orderers;
            d.ordered = Some(now);
        });

        if let Err(failed) = self.validate() {
            self.machine.cancel_last_action();
            return Err(ActionError::Validation(failed));
        }
        Ok(())
    }

    fn apply_complete(&mut self, _args: TransactionArgs) -> Result<(), ActionError> {
        let now = Utc::now();
        self.machine.transition(TransactionState::Completed, |d| {
            d.completed = Some(now);
        });
        Ok(())
    }

    fn apply_cancel(&mut self, _args: TransactionArgs) -> Result<(), ActionError> {
        self.machine.transition(TransactionState::Canceled, |_| {});
        Ok(())
    }
}

impl Actionable for Transaction {
    type State = TransactionState;
    type Data = TransactionData;
    type Args = TransactionArgs;

    fn machine(&self) -> &StateMachine<TransactionState, TransactionData> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<TransactionState, TransactionData> {
        &mut self.machine
    }

    fn table() -> &'static ActionTable<Transaction> {
        &TABLE
    }
}

impl Undoable for Transaction {
    fn duals() -> &'static DualTable {
        &DUALS
    }

    fn history(&self) -> &CommandHistory<TransactionArgs> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut CommandHistory<TransactionArgs> {
        &mut self.history
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.machine.record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record =
            SnapshotRecord::<TransactionState, TransactionData>::deserialize(deserializer)?;
        Ok(Transaction::restore(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use crate::ledger::{cell, Amount, Row};
    use crate::models::{Term, TermViolation};
    use crate::undo::Undoable;

    fn bare_contract() -> Contract {
        let mut contract = Contract::new();
        contract
            .change_ownership(Actor::new("Owner"))
            .unwrap()
            .add_term(Term::new("Term"))
            .unwrap()
            .sign()
            .unwrap()
            .publish()
            .unwrap();
        contract
    }

    #[test]
    fn new_transaction_starts_in_created() {
        let transaction = Transaction::new(bare_contract());
        assert_eq!(transaction.state(), TransactionState::Created);
        assert!(transaction.orderers().is_empty());
        assert!(transaction.ordered().is_none());
        assert!(transaction.completed().is_none());
    }

    #[test]
    fn order_stamps_orderers_and_timestamp() {
        let mut transaction = Transaction::new(bare_contract());
        let john = Actor::new("John");
        transaction.order(vec![john.clone()]).unwrap();

        assert_eq!(transaction.state(), TransactionState::Ordered);
        assert_eq!(transaction.orderers(), [john]);
        assert!(transaction.ordered().is_some());
    }

    #[test]
    fn complete_is_terminal() {
        let mut transaction = Transaction::new(bare_contract());
        transaction.order(vec![Actor::new("John")]).unwrap();
        transaction.complete().unwrap();

        assert_eq!(transaction.state(), TransactionState::Completed);
        assert!(transaction.completed().is_some());
        assert!(TransactionState::Completed.is_terminal());
        assert!(matches!(
            transaction.cancel().unwrap_err(),
            ActionError::IllegalAction { .. }
        ));
    }

    #[test]
    fn rejected_order_rolls_back_to_created() {
        let mut contract = Contract::new();
        contract
            .change_ownership(Actor::new("Owner"))
            .unwrap()
            .add_term(Term::new("Single orderer").validate_with(|t: &Transaction| {
                if t.orderers().len() == 1 {
                    Ok(())
                } else {
                    Err(TermViolation::new("exactly one orderer required"))
                }
            }))
            .unwrap()
            .sign()
            .unwrap();

        let mut transaction = Transaction::new(contract);
        let err = transaction
            .order(vec![Actor::new("A"), Actor::new("B")])
            .unwrap_err();

        assert!(matches!(err, ActionError::Validation(_)));
        assert_eq!(transaction.state(), TransactionState::Created);
        assert!(transaction.ordered().is_none());
        assert!(transaction.orderers().is_empty());

        // A conforming order then goes through.
        transaction.order(vec![Actor::new("A")]).unwrap();
        assert_eq!(transaction.state(), TransactionState::Ordered);
    }

    #[test]
    fn pricing_folds_zero_sum_rows_into_totals() {
        let john = Actor::new("John");
        let william = Actor::new("William");

        let mut contract = Contract::new();
        let (j, w) = (john.clone(), william.clone());
        contract
            .change_ownership(john.clone())
            .unwrap()
            .add_term(Term::new("Flat price").price_with(move |_, _| {
                Ok(Row::tagged(vec![cell(&w, -10), cell(&j, 10)], ["customer"]).into())
            }))
            .unwrap()
            .sign()
            .unwrap();

        let transaction = Transaction::new(contract);
        let ledger = transaction.compute_price().unwrap();

        assert_eq!(ledger.total_for(&john), Amount::from(10));
        assert_eq!(ledger.total_for(&william), Amount::from(-10));
        assert_eq!(
            ledger.totals_on_tag("customer")[&william.id()],
            Amount::from(-10)
        );
    }

    #[test]
    fn later_rules_read_earlier_totals() {
        let shop = Actor::new("Shop");
        let customer = Actor::new("Customer");
        let state = Actor::new("State");

        let mut contract = Contract::new();
        let (s1, c1) = (shop.clone(), customer.clone());
        let (c2, st) = (customer.clone(), state.clone());
        contract
            .change_ownership(shop.clone())
            .unwrap()
            .add_term(Term::new("Net").price_with(move |_, _| {
                Ok(Row::tagged(vec![cell(&c1, -100), cell(&s1, 100)], ["net"]).into())
            }))
            .unwrap()
            // 20% of the customer's net position, charged to the customer.
            .add_term(Term::new("VAT").price_with(move |ledger: &Ledger, _| {
                let net = ledger.totals_on_tag("net")[&c2.id()];
                let vat = net * "0.2".parse::<Amount>().unwrap();
                Ok(Row::new(vec![cell(&c2, vat), cell(&st, -vat)]).into())
            }))
            .unwrap()
            .sign()
            .unwrap();

        let ledger = Transaction::new(contract).compute_price().unwrap();
        assert_eq!(ledger.total_for(&customer), Amount::from(-120));
        assert_eq!(ledger.total_for(&state), Amount::from(20));
        assert_eq!(ledger.total_for(&shop), Amount::from(100));
    }

    #[test]
    fn unbalanced_rule_yields_no_ledger() {
        let john = Actor::new("John");
        let william = Actor::new("William");

        let mut contract = Contract::new();
        let (j, w) = (john.clone(), william.clone());
        contract
            .change_ownership(john)
            .unwrap()
            .add_term(Term::new("Broken").price_with(move |_, _| {
                Ok(Row::new(vec![cell(&w, -10), cell(&j, 11)]).into())
            }))
            .unwrap()
            .sign()
            .unwrap();

        let err = Transaction::new(contract).compute_price().unwrap_err();
        assert!(matches!(err, LedgerError::UnbalancedRow { .. }));
    }

    #[test]
    fn do_action_order_is_undoable() {
        let mut transaction = Transaction::new(bare_contract());
        transaction
            .do_action(action::ORDER, TransactionArgs::Orderers(vec![Actor::new("J")]))
            .unwrap();
        assert_eq!(transaction.state(), TransactionState::Ordered);

        assert!(transaction.undo().unwrap());
        assert_eq!(transaction.state(), TransactionState::Created);
        assert!(transaction.ordered().is_none());

        assert!(transaction.redo().unwrap());
        assert_eq!(transaction.state(), TransactionState::Ordered);
    }

    #[test]
    fn serialization_round_trips_the_current_snapshot() {
        let mut transaction = Transaction::new(bare_contract());
        transaction.order(vec![Actor::new("John")]).unwrap();

        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["state"], "ordered");
        assert_eq!(value["contract"]["state"], "published");

        let restored: Transaction = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&restored).unwrap(), value);
        assert_eq!(restored.state(), TransactionState::Ordered);
        assert!(restored.history().is_empty());
        assert_eq!(restored.machine().depth(), 1);
    }
}
