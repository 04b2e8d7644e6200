//! Transition table for vehicle lifecycles.
//!
//! Legality of every status change lives here as data: a list of rules, each
//! naming an action, a guard over the current status and the status the
//! action produces. Creation is not a rule; it has no prior status.

use super::guard::Guard;
use super::status::VehicleStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mutation applied to an existing record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Transfer,
    SellAndRegister,
    Scrap,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Transfer => write!(f, "transfer"),
            Action::SellAndRegister => write!(f, "sell and register"),
            Action::Scrap => write!(f, "scrap"),
        }
    }
}

/// One row of the table.
#[derive(Clone, Debug)]
pub struct TransitionRule {
    pub action: Action,
    pub guard: Guard<VehicleStatus>,
    pub to: VehicleStatus,
}

impl TransitionRule {
    pub fn new(action: Action, guard: Guard<VehicleStatus>, to: VehicleStatus) -> Self {
        Self { action, guard, to }
    }

    /// Whether this rule fires for `action` from `current`.
    pub fn applies(&self, action: Action, current: &VehicleStatus) -> bool {
        self.action == action && self.guard.check(current)
    }
}

/// Ordered rule set; the first applicable rule wins.
#[derive(Clone, Debug)]
pub struct LifecycleTable {
    rules: Vec<TransitionRule>,
}

impl LifecycleTable {
    /// Build a table from explicit rules.
    pub fn new(rules: Vec<TransitionRule>) -> Self {
        Self { rules }
    }

    /// The deployed vehicle lifecycle:
    ///
    /// | action            | from                   | to        |
    /// |-------------------|------------------------|-----------|
    /// | transfer          | New                    | Dealer    |
    /// | sell and register | New, Dealer, Customer  | Customer  |
    /// | scrap             | any                    | Scrapped  |
    pub fn standard() -> Self {
        Self::new(vec![
            TransitionRule::new(
                Action::Transfer,
                Guard::only(VehicleStatus::New),
                VehicleStatus::Dealer,
            ),
            TransitionRule::new(
                Action::SellAndRegister,
                Guard::new(|s: &VehicleStatus| *s != VehicleStatus::Scrapped),
                VehicleStatus::Customer,
            ),
            TransitionRule::new(Action::Scrap, Guard::any(), VehicleStatus::Scrapped),
        ])
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Status produced by `action` from `current`, or `None` if no rule allows it.
    pub fn next_status(&self, action: Action, current: VehicleStatus) -> Option<VehicleStatus> {
        self.rules
            .iter()
            .find(|rule| rule.applies(action, &current))
            .map(|rule| rule.to)
    }

    /// Whether any action moves `from` to `to`.
    pub fn permits(&self, from: VehicleStatus, to: VehicleStatus) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.to == to && rule.guard.check(&from))
    }
}

impl Default for LifecycleTable {
    fn default() -> Self {
        Self::standard()
    }
}
