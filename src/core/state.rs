//! The `State` trait implemented by lifecycle statuses.
//!
//! A state is a plain value describing where a record sits in its lifecycle.
//! All methods are pure so they can be evaluated identically by every
//! executor replaying an invocation.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for lifecycle states.
///
/// # Required Traits
///
/// - `Clone` + `PartialEq`: states are compared by transition rules
/// - `Debug`: diagnostics and log fields
/// - `Serialize` + `Deserialize`: states are part of the persisted record
///
/// # Example
///
/// ```rust
/// use vlm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum PermitState {
///     Issued,
///     Revoked,
/// }
///
/// impl State for PermitState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Issued => "Issued",
///             Self::Revoked => "Revoked",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Revoked)
///     }
/// }
///
/// assert!(PermitState::Revoked.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used on the wire and in log fields.
    fn name(&self) -> &str;

    /// Terminal states end the lifecycle. Rules may still allow a terminal
    /// state to be re-entered (an idempotent re-apply), but never left.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
