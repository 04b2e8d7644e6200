//! Errors surfaced by contract invocations.

use crate::core::{Action, VehicleStatus};
use crate::ledger::LedgerError;
use thiserror::Error;

/// Every failure an invocation can end with.
///
/// All variants are terminal: the invocation writes nothing and the host
/// transaction is expected to be discarded.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to marshal: {0}")]
    Marshal(String),

    #[error("stored value for '{chassis_no}' is not a valid record: {reason}")]
    Unmarshal { chassis_no: String, reason: String },

    #[error("cannot {action} vehicle '{chassis_no}' in status {from}")]
    InvalidTransition {
        chassis_no: String,
        action: Action,
        from: VehicleStatus,
    },

    #[error("history for '{chassis_no}' unavailable: {reason}")]
    HistoryIterator { chassis_no: String, reason: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("vehicle '{0}' does not exist")]
    RecordNotFound(String),

    #[error("vehicle '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid arguments for '{function}': {}", problems.join("; "))]
    InvalidArguments {
        function: String,
        problems: Vec<String>,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
