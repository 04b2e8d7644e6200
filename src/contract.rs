//! The contract: configuration, transition table and formatter bundled
//! behind a single `invoke` entry point.

use crate::builder::ContractBuilder;
use crate::config::EngineConfig;
use crate::core::LifecycleTable;
use crate::dispatch::Operation;
use crate::engine::LifecycleEngine;
use crate::error::ContractError;
use crate::history::{HistoryReader, TimestampFormatter};
use crate::ledger::Ledger;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of an invocation as handed back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Empty, one serialized record, or a serialized history array.
    Success(Vec<u8>),
    /// Human-readable failure.
    Error(String),
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Response::Success(bytes) => Some(bytes),
            Response::Error(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success(_) => None,
            Response::Error(message) => Some(message),
        }
    }
}

impl From<Result<Vec<u8>, ContractError>> for Response {
    fn from(result: Result<Vec<u8>, ContractError>) -> Self {
        match result {
            Ok(payload) => Response::Success(payload),
            Err(e) => Response::Error(e.to_string()),
        }
    }
}

/// Vehicle lifecycle contract.
///
/// ```
/// use vlm::contract::{Contract, Response};
/// use vlm::ledger::MemoryLedger;
///
/// let contract = Contract::default();
/// let mut ledger = MemoryLedger::new();
///
/// assert!(contract.invoke(&mut ledger, "createCar", &["CH001".into()]).is_success());
/// let car = contract.invoke(&mut ledger, "getCar", &["CH001".into()]);
/// assert!(String::from_utf8_lossy(car.payload().unwrap()).contains("\"status\":\"New\""));
/// ```
#[derive(Clone)]
pub struct Contract {
    config: EngineConfig,
    table: LifecycleTable,
    formatter: Arc<dyn TimestampFormatter>,
}

impl Default for Contract {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Contract {
    /// Standard transition table, timestamps rendered per `config`.
    pub fn new(config: EngineConfig) -> Self {
        let formatter = Arc::new(config.timestamp_format);
        Self::from_parts(config, LifecycleTable::standard(), formatter)
    }

    pub fn builder() -> ContractBuilder {
        ContractBuilder::new()
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        table: LifecycleTable,
        formatter: Arc<dyn TimestampFormatter>,
    ) -> Self {
        Self {
            config,
            table,
            formatter,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &LifecycleTable {
        &self.table
    }

    /// Engine bound to `ledger` for one transaction.
    pub fn engine<'a, L: Ledger>(&'a self, ledger: &'a mut L) -> LifecycleEngine<'a, L> {
        LifecycleEngine::new(ledger, &self.config, &self.table)
    }

    /// History reader bound to `ledger`.
    pub fn history<'a, L: Ledger + 'a>(&'a self, ledger: &'a L) -> HistoryReader<'a, L> {
        HistoryReader::new(ledger, self.formatter.as_ref())
    }

    /// Run a resolved operation and produce its payload.
    pub fn execute<L: Ledger>(
        &self,
        ledger: &mut L,
        operation: &Operation,
    ) -> Result<Vec<u8>, ContractError> {
        debug!(
            operation = operation.name(),
            chassis_no = operation.chassis_no(),
            "executing"
        );
        match operation {
            Operation::Create { chassis_no } => {
                self.engine(ledger).create(chassis_no)?;
                Ok(Vec::new())
            }
            Operation::Transfer {
                chassis_no,
                new_owner,
            } => {
                self.engine(ledger).transfer(chassis_no, new_owner)?;
                Ok(Vec::new())
            }
            Operation::SellAndRegister {
                chassis_no,
                new_owner,
                registration_no,
                registration_expiry,
            } => {
                self.engine(ledger).sell_and_register(
                    chassis_no,
                    new_owner,
                    registration_no,
                    registration_expiry,
                )?;
                Ok(Vec::new())
            }
            Operation::Scrap { chassis_no } => {
                self.engine(ledger).scrap(chassis_no)?;
                Ok(Vec::new())
            }
            Operation::Get { chassis_no } => {
                Ok(self.engine(ledger).get(chassis_no)?.unwrap_or_default())
            }
            Operation::History { chassis_no } => self.history(&*ledger).get_history(chassis_no),
        }
    }

    /// Resolve `function` with `args` and run it.
    pub fn invoke<L: Ledger>(&self, ledger: &mut L, function: &str, args: &[String]) -> Response {
        let result =
            Operation::parse(function, args).and_then(|operation| self.execute(ledger, &operation));
        if let Err(e) = &result {
            warn!(function, error = %e, "invocation failed");
        }
        result.into()
    }
}
