//! Compositional contract and transaction modeling over snapshot-based
//! state machines.
//!
//! The building blocks are layered:
//!
//! - [`core`]: the [`StateMachine`], a typed state paired with a data
//!   payload, evolving through immutable snapshots chained to their
//!   predecessors, plus the [`ActionTable`] declaring which actions are
//!   legal in which state.
//! - [`undo`]: the [`CommandHistory`], where every recorded action is
//!   paired with its declared inverse, giving linear undo/redo on top of
//!   the snapshot chain.
//! - [`ledger`]: the zero-sum pricing engine, in which contract terms
//!   produce balanced rows consolidated into per-actor totals.
//! - [`models`]: the domain entities [`Actor`], [`Term`], [`Contract`]
//!   and [`Transaction`].
//!
//! # Example
//!
//! ```
//! use accord::ledger::{cell, Amount, Row};
//! use accord::models::{Actor, Contract, Term, Transaction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shop = Actor::new("Shop");
//! let customer = Actor::new("Customer");
//!
//! let mut contract = Contract::new();
//! let (s, c) = (shop.clone(), customer.clone());
//! contract
//!     .change_ownership(shop.clone())?
//!     .add_party(customer.clone())?
//!     .add_term(Term::new("Flat price").price_with(move |_, _| {
//!         Ok(Row::new(vec![cell(&c, -10), cell(&s, 10)]).into())
//!     }))?
//!     .sign()?
//!     .publish()?;
//!
//! let mut transaction = Transaction::new(contract);
//! transaction.order(vec![customer.clone()])?;
//!
//! let ledger = transaction.compute_price()?;
//! assert_eq!(ledger.total_for(&shop), Amount::from(10));
//! assert_eq!(ledger.total_for(&customer), Amount::from(-10));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod ledger;
pub mod models;
pub mod undo;

pub use crate::core::{
    ActionError, ActionTable, Actionable, Snapshot, SnapshotRecord, State, StateMachine,
};
pub use crate::ledger::{Amount, Ledger, LedgerError};
pub use crate::models::{Actor, Contract, Term, Transaction};
pub use crate::undo::{Command, CommandHistory, DualTable, Undoable};
