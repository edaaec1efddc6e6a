//! Domain entities: actors, terms, contracts and transactions.

mod actor;
mod contract;
mod term;
mod transaction;
mod validator;

pub use actor::{Actor, ActorId};
pub use contract::{Contract, ContractArgs, ContractData, ContractState};
pub use term::{PriceHook, Term, TermViolation, ValidateHook};
pub use transaction::{Transaction, TransactionArgs, TransactionData, TransactionState};
pub use validator::{TermFailure, ValidationFailed};

pub use contract::action as contract_action;
pub use transaction::action as transaction_action;
