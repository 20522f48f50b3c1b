//! State trait for enum-based machines.
//!
//! The entry/exit dispatcher (`crate::hsm`) is generic over any type
//! implementing this trait. The flat table machine uses `StateId` instead.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Trait for states of an entry/exit state machine.
///
/// # Required Traits
///
/// - `Clone`: the current state is copied into transition records
/// - `PartialEq`: transitions compare source and target
/// - `Debug`: states show up in log fields
/// - `Serialize` + `DeserializeOwned`: history can be dumped for diagnostics
///
/// # Example
///
/// ```rust
/// use fsmloop::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum BombState {
///     Setting,
///     Timing,
/// }
///
/// impl State for BombState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Setting => "Setting",
///             Self::Timing => "Timing",
///         }
///     }
/// }
///
/// assert_eq!(BombState::Timing.name(), "Timing");
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
