//! Ledger rows and cells.

use super::amount::Amount;
use crate::models::Actor;
use serde::{Deserialize, Serialize};

/// One signed entry: an actor and the amount credited (positive) or
/// charged (negative) to them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    pub actor: Actor,
    pub amount: Amount,
}

/// Build a cell. Mirrors the helper available to pricing rules.
pub fn cell(actor: &Actor, amount: impl Into<Amount>) -> Cell {
    Cell {
        actor: actor.clone(),
        amount: amount.into(),
    }
}

/// An ordered sequence of cells produced by one pricing rule, plus tags
/// for later aggregation.
///
/// Invariant: cell amounts sum to exactly zero. The invariant is enforced
/// when the row is consolidated into a [`Ledger`](super::Ledger), not at
/// construction, so rules can build rows freely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<Cell>,
    tags: Vec<String>,
    term: Option<String>,
}

impl Row {
    /// An untagged row.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            tags: Vec::new(),
            term: None,
        }
    }

    /// A row carrying aggregation tags.
    pub fn tagged<T: Into<String>>(cells: Vec<Cell>, tags: impl IntoIterator<Item = T>) -> Self {
        Self {
            cells,
            tags: tags.into_iter().map(Into::into).collect(),
            term: None,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Name of the term that produced this row, once consolidated.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub(crate) fn set_term(&mut self, name: &str) {
        self.term = Some(name.to_string());
    }

    /// Signed sum over all cells; zero for a valid row.
    pub fn sum(&self) -> Amount {
        self.cells.iter().map(|c| c.amount).sum()
    }
}

/// What a pricing rule yields: one row or several.
pub enum RuleRows {
    One(Row),
    Many(Vec<Row>),
}

impl RuleRows {
    pub fn into_vec(self) -> Vec<Row> {
        match self {
            Self::One(row) => vec![row],
            Self::Many(rows) => rows,
        }
    }
}

impl From<Row> for RuleRows {
    fn from(row: Row) -> Self {
        Self::One(row)
    }
}

impl From<Vec<Row>> for RuleRows {
    fn from(rows: Vec<Row>) -> Self {
        Self::Many(rows)
    }
}
