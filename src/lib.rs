//! VLM: a vehicle lifecycle ledger contract
//!
//! Vehicles are tracked by chassis number through a fixed lifecycle:
//! manufactured (`New`), handed to a dealer (`Dealer`), sold and
//! registered to a customer (`Customer`) and finally `Scrapped`. Every
//! change is written to an append-only versioned key-value ledger, so the
//! full provenance of a vehicle can be read back.
//!
//! # Core Concepts
//!
//! - **Status**: the lifecycle position, declared with [`state_enum!`]
//! - **Transition table**: guarded rules deciding which action moves a
//!   vehicle where
//! - **Ledger**: the versioned store the contract reads and writes
//! - **History**: every version of a record with its transaction metadata
//!
//! # Example
//!
//! ```rust
//! use vlm::{Contract, MemoryLedger, Response};
//!
//! let contract = Contract::default();
//! let mut ledger = MemoryLedger::new();
//! let args = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
//!
//! contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
//! contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerA"]));
//!
//! let response = contract.invoke(&mut ledger, "getCar", &args(&["CH001"]));
//! assert_eq!(
//!     response,
//!     Response::Success(
//!         br#"{"chassisNo":"CH001","owner":"DealerA","registrationNo":"","registrationExpiryDae":"","status":"Dealer"}"#
//!             .to_vec()
//!     )
//! );
//!
//! let response = contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerB"]));
//! assert!(!response.is_success());
//! ```

pub mod builder;
pub mod config;
pub mod contract;
pub mod core;
pub mod dispatch;
pub mod effects;
pub mod engine;
pub mod error;
pub mod history;
pub mod ledger;

// Re-export commonly used types
pub use config::EngineConfig;
pub use contract::{Contract, Response};
pub use crate::core::{State, VehicleRecord, VehicleStatus};
pub use dispatch::Operation;
pub use engine::LifecycleEngine;
pub use error::ContractError;
pub use history::HistoryReader;
pub use ledger::{Ledger, MemoryLedger};
