//! Term-level transaction validation.
//!
//! Validation never short-circuits: every term's hook runs, and the
//! aggregated failure carries one entry per violated term so callers see
//! the full picture in a single pass.

use super::term::TermViolation;
use std::fmt;
use thiserror::Error;

/// One violated term: its position in the contract, its name and the
/// violation it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFailure {
    pub index: usize,
    pub term: String,
    pub error: TermViolation,
}

impl fmt::Display for TermFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term #{} '{}': {}", self.index, self.term, self.error)
    }
}

/// One or more term validators rejected the transaction.
///
/// When reached through the order path, the just-applied transition has
/// been rolled back before this error is surfaced: no transition is
/// observably retained on validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationFailed {
    pub failures: Vec<TermFailure>,
}

impl ValidationFailed {
    pub fn new(failures: Vec<TermFailure>) -> Self {
        Self { failures }
    }
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction validation failed ({} term{})",
            self.failures.len(),
            if self.failures.len() == 1 { "" } else { "s" }
        )?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}
