//! Guard predicates for transition rules.
//!
//! A guard decides whether a rule applies to the current status. Guards are
//! pure and deterministic; they never read the ledger or the clock.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure predicate over the current state.
///
/// # Example
///
/// ```rust
/// use vlm::core::{Guard, VehicleStatus};
///
/// let not_scrapped = Guard::new(|s: &VehicleStatus| *s != VehicleStatus::Scrapped);
///
/// assert!(not_scrapped.check(&VehicleStatus::Dealer));
/// assert!(!not_scrapped.check(&VehicleStatus::Scrapped));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that passes for exactly one state.
    pub fn only(state: S) -> Self
    where
        S: 'static,
    {
        Self::new(move |current| *current == state)
    }

    /// Guard that passes for every state.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            _phantom: PhantomData,
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VehicleStatus;

    #[test]
    fn guard_allows_matching_states() {
        let guard = Guard::only(VehicleStatus::New);

        assert!(guard.check(&VehicleStatus::New));
        assert!(!guard.check(&VehicleStatus::Dealer));
    }

    #[test]
    fn guard_checks_non_final_states() {
        let guard = Guard::new(|s: &VehicleStatus| !s.is_final());

        assert!(guard.check(&VehicleStatus::New));
        assert!(guard.check(&VehicleStatus::Customer));
        assert!(!guard.check(&VehicleStatus::Scrapped));
    }

    #[test]
    fn any_guard_passes_everything() {
        let guard = Guard::<VehicleStatus>::any();

        for status in VehicleStatus::ALL {
            assert!(guard.check(status));
        }
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::only(VehicleStatus::Dealer);
        let cloned = guard.clone();

        assert_eq!(
            guard.check(&VehicleStatus::Dealer),
            cloned.check(&VehicleStatus::Dealer)
        );
        assert!(!cloned.check(&VehicleStatus::New));
    }
}
