//! Builder API for assembling a contract.
//!
//! This module provides the fluent [`ContractBuilder`] and the
//! [`state_enum!`](crate::state_enum) macro used to declare lifecycle statuses.

pub mod contract;
pub mod error;
pub mod macros;

pub use contract::ContractBuilder;
pub use error::BuildError;

use crate::core::{Action, Guard, TransitionRule, VehicleStatus};

/// Rule that fires from exactly one status.
///
/// # Example
///
/// ```
/// use vlm::builder::{rule_from, ContractBuilder};
/// use vlm::core::{Action, VehicleStatus};
///
/// let contract = ContractBuilder::new()
///     .rule(rule_from(Action::Transfer, VehicleStatus::New, VehicleStatus::Dealer))
///     .build()
///     .unwrap();
/// assert_eq!(contract.table().rules().len(), 1);
/// ```
pub fn rule_from(action: Action, from: VehicleStatus, to: VehicleStatus) -> TransitionRule {
    TransitionRule::new(action, Guard::only(from), to)
}

/// Rule with an arbitrary guard predicate.
///
/// # Example
///
/// ```
/// use vlm::builder::guarded_rule;
/// use vlm::core::{Action, State, VehicleStatus};
///
/// let rule = guarded_rule(Action::Scrap, VehicleStatus::Scrapped, |s| !s.is_final());
/// assert!(rule.applies(Action::Scrap, &VehicleStatus::Customer));
/// assert!(!rule.applies(Action::Scrap, &VehicleStatus::Scrapped));
/// ```
pub fn guarded_rule<F>(action: Action, to: VehicleStatus, guard: F) -> TransitionRule
where
    F: Fn(&VehicleStatus) -> bool + Send + Sync + 'static,
{
    TransitionRule::new(action, Guard::new(guard), to)
}
