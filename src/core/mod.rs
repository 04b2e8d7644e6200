//! Core lifecycle types.
//!
//! - `State` and `Guard`: the pure building blocks of transition rules
//! - `VehicleStatus` and `VehicleRecord`: the persisted data model
//! - `LifecycleTable`: which status changes each action may make
//!
//! Nothing in this module touches the ledger, a clock or any other source of
//! non-determinism.

mod guard;
mod record;
mod state;
mod status;
mod table;

pub use guard::Guard;
pub use record::VehicleRecord;
pub use state::State;
pub use status::VehicleStatus;
pub use table::{Action, LifecycleTable, TransitionRule};
