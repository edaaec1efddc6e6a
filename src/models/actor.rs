//! Parties to contracts and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity token for an actor.
///
/// Aggregation (ledger totals, party lookups) compares identities, never
/// structural equality: two actors with the same name remain distinct.
/// The identity survives serialization, so a restored entity still refers
/// to the same parties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(Uuid);

impl ActorId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A party referenced from contracts, transactions and ledger cells.
///
/// Actors are immutable identity tokens; they are shared across the whole
/// object graph and never synchronized or mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::generate(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_different_identity() {
        let a = Actor::new("John");
        let b = Actor::new("John");

        assert_eq!(a.name(), b.name());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn identity_survives_serialization() {
        let a = Actor::new("John");
        let json = serde_json::to_string(&a).unwrap();
        let back: Actor = serde_json::from_str(&json).unwrap();

        assert_eq!(a, back);
        assert_eq!(a.id(), back.id());
    }
}
