//! Zero-sum pricing engine.
//!
//! A [`Ledger`] accumulates the rows produced by a contract's pricing rules
//! and maintains running per-actor totals. Totals are derived state: they are
//! recomputed from scratch from the rows on every mutation, and the
//! recomputation is where the zero-sum invariant is enforced: every single
//! row must balance, not merely the aggregate.

mod amount;
mod error;
mod row;

pub use amount::Amount;
pub use error::LedgerError;
pub use row::{cell, Cell, Row, RuleRows};

use crate::models::{Actor, ActorId, Transaction};
use std::collections::BTreeMap;
use std::fmt;

/// The computed collection of zero-sum rows and per-actor running totals
/// produced from a transaction's contract terms.
///
/// A ledger is exclusively owned by the transaction that requested it:
/// [`Transaction::compute_price`] constructs a fresh one per call, and a
/// failed computation produces no ledger at all.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    rows: Vec<Row>,
    totals: BTreeMap<ActorId, Amount>,
}

impl Ledger {
    /// An empty ledger: no rows, no totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consolidate a pre-built row set into a ledger.
    ///
    /// Fails with [`LedgerError::UnbalancedRow`] if any row's cells do not
    /// sum to exactly zero.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, LedgerError> {
        let mut ledger = Self { rows, totals: BTreeMap::new() };
        ledger.consolidate()?;
        Ok(ledger)
    }

    /// Run every pricing rule of the transaction's contract, in term
    /// declaration order, and consolidate the produced rows.
    ///
    /// Each rule is invoked with the ledger accumulated so far, so later
    /// terms may read totals produced by earlier ones (a VAT rule reading a
    /// `customer` tag's running total, say); term order is significant.
    /// Every produced row is tagged with its originating term. Any rule
    /// failure or unbalanced row aborts the whole call.
    pub fn compute(transaction: &Transaction) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();

        for term in transaction.contract().terms() {
            let Some(rule) = term.price_hook() else {
                continue;
            };

            let produced = rule(&ledger, transaction).map_err(|source| LedgerError::Rule {
                term: term.name.clone(),
                source,
            })?;

            for mut row in produced.into_vec() {
                row.set_term(&term.name);
                ledger.rows.push(row);
            }
            ledger.consolidate()?;
        }

        tracing::debug!(
            rows = ledger.rows.len(),
            actors = ledger.totals.len(),
            "ledger computed"
        );
        Ok(ledger)
    }

    /// The consolidated rows, in production order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Running totals per actor identity, folded over every row.
    pub fn totals(&self) -> &BTreeMap<ActorId, Amount> {
        &self.totals
    }

    /// The running total for one actor; zero when the actor appears in no
    /// row.
    pub fn total_for(&self, actor: &Actor) -> Amount {
        self.totals.get(&actor.id()).copied().unwrap_or(Amount::ZERO)
    }

    /// The totals fold restricted to rows carrying `tag`.
    pub fn totals_on_tag(&self, tag: &str) -> BTreeMap<ActorId, Amount> {
        let mut totals = BTreeMap::new();
        for row in self.rows.iter().filter(|r| r.has_tag(tag)) {
            for cell in row.cells() {
                *totals.entry(cell.actor.id()).or_insert(Amount::ZERO) += cell.amount;
            }
        }
        totals
    }

    /// Recompute `totals` from scratch and enforce the per-row zero-sum
    /// invariant.
    fn consolidate(&mut self) -> Result<(), LedgerError> {
        let mut totals = BTreeMap::new();

        for row in &self.rows {
            let sum = row.sum();
            if !sum.is_zero() {
                return Err(LedgerError::UnbalancedRow {
                    term: row.term().unwrap_or("unnamed").to_string(),
                    sum,
                });
            }

            for cell in row.cells() {
                *totals.entry(cell.actor.id()).or_insert(Amount::ZERO) += cell.amount;
            }
        }

        self.totals = totals;
        Ok(())
    }

    /// Actors in first-appearance order across the rows.
    fn actor_columns(&self) -> Vec<Actor> {
        let mut actors: Vec<Actor> = Vec::new();
        for row in &self.rows {
            for cell in row.cells() {
                if !actors.iter().any(|a| a.id() == cell.actor.id()) {
                    actors.push(cell.actor.clone());
                }
            }
        }
        actors
    }
}

/// Tab-separated table: one column per actor, one line per row, amounts
/// fixed to 2 fractional digits, with the originating term per line.
impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actors = self.actor_columns();
        let header: Vec<&str> = actors.iter().map(|a| a.name()).collect();
        let mut lines = vec![header.join("\t")];

        for row in &self.rows {
            let mut columns: Vec<String> = vec![String::new(); actors.len()];
            for cell in row.cells() {
                if let Some(i) = actors.iter().position(|a| a.id() == cell.actor.id()) {
                    columns[i] = cell.amount.fixed();
                }
            }

            lines.push("------------------".to_string());
            lines.push(format!(
                "{}\t\t\t{}",
                columns.join("\t"),
                row.term().unwrap_or("")
            ));
        }

        write!(f, "{}", lines.join("\n"))
    }
}
