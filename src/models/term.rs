//! Contract terms: pluggable validation and pricing rule units.

use crate::ledger::{Ledger, RuleRows};
use crate::models::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A free-form rule violation raised by a term hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TermViolation(String);

impl TermViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Validation hook: raises a [`TermViolation`] when the transaction breaks
/// this term.
pub type ValidateHook = Arc<dyn Fn(&Transaction) -> Result<(), TermViolation> + Send + Sync>;

/// Pricing hook: produces one or many zero-sum rows. Receives the ledger
/// accumulated by earlier terms, so it may read their running totals.
pub type PriceHook =
    Arc<dyn Fn(&Ledger, &Transaction) -> Result<RuleRows, TermViolation> + Send + Sync>;

/// A pluggable rule unit on a contract, contributing optional validation
/// and/or pricing logic.
///
/// Hooks are behavior, not data: they are skipped by serde, so a term
/// restored from JSON keeps its name and description but no logic.
#[derive(Clone, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    validate: Option<ValidateHook>,
    #[serde(skip)]
    price: Option<PriceHook>,
}

impl Term {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            validate: None,
            price: None,
        }
    }

    /// Attach a human-readable description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Attach a validation hook.
    pub fn validate_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Transaction) -> Result<(), TermViolation> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(hook));
        self
    }

    /// Attach a pricing hook.
    pub fn price_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Ledger, &Transaction) -> Result<RuleRows, TermViolation> + Send + Sync + 'static,
    {
        self.price = Some(Arc::new(hook));
        self
    }

    pub fn validate_hook(&self) -> Option<&ValidateHook> {
        self.validate.as_ref()
    }

    pub fn price_hook(&self) -> Option<&PriceHook> {
        self.price.as_ref()
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Term")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("validate", &self.validate.is_some())
            .field("price", &self.price.is_some())
            .finish()
    }
}

/// Markdown-flavored rendering used by contract display.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n# {}\n\n{}\n",
            self.name,
            self.description.as_deref().unwrap_or("")
        )
    }
}
