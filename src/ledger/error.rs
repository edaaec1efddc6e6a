//! Pricing engine errors.

use super::amount::Amount;
use crate::models::TermViolation;
use thiserror::Error;

/// Errors that abort a whole `compute()` call. A ledger is either fully
/// valid or not produced at all; there are no partial ledgers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A pricing rule produced a row whose cells do not sum to zero.
    /// Money must balance per rule, not merely in aggregate.
    #[error("unbalanced ledger row from term '{term}': cells sum to {sum}, expected zero")]
    UnbalancedRow { term: String, sum: Amount },

    /// A pricing rule itself failed.
    #[error("pricing rule of term '{term}' failed: {source}")]
    Rule {
        term: String,
        #[source]
        source: TermViolation,
    },
}
