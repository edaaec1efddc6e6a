//! Core State trait for entity states.
//!
//! Every stateful entity declares its states as an enum implementing this
//! trait. States are plain values: inspecting them has no side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for entity states.
///
/// States represent immutable values that describe the current position of
/// an entity in its lifecycle. The serialized form of a state must match
/// `name()` so that snapshots round-trip through JSON.
///
/// # Required Traits
///
/// - `Clone`: states are copied into every snapshot
/// - `PartialEq`: states must be comparable for transition logic
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states must be serializable for snapshots
///
/// # Example
///
/// ```rust
/// use accord::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum OrderState {
///     #[serde(rename = "created")]
///     Created,
///     #[serde(rename = "shipped")]
///     Shipped,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Created => "created",
///             Self::Shipped => "shipped",
///         }
///     }
///
///     fn is_terminal(&self) -> bool {
///         matches!(self, Self::Shipped)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display, logging and action-table lookup.
    ///
    /// Must equal the state's serialized form.
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state.
    ///
    /// Terminal states expose an empty (or reduced) action set; the
    /// action table is the authoritative source of what is callable.
    ///
    /// Default implementation returns `false`.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Trait alias for the data payload carried by snapshots.
///
/// The payload is cloned into each new snapshot and must round-trip
/// through JSON for `to_value()` and restoration.
pub trait EntityData:
    Clone + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
}

impl<T> EntityData for T where
    T: Clone + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
}
