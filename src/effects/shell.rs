//! Shared ledger environment and invocation effects.

use crate::contract::Contract;
use crate::dispatch::Operation;
use crate::error::ContractError;
use crate::ledger::{Ledger, LedgerError};
use std::sync::{Arc, Mutex, MutexGuard};
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use tracing::debug;

/// Ledger shared between concurrent callers.
///
/// Every invocation holds the lock for its whole read-modify-write, so
/// transactions on a shared ledger are serialized.
pub struct SharedLedger<L> {
    inner: Arc<Mutex<L>>,
}

impl<L> Clone for SharedLedger<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: Ledger> SharedLedger<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Exclusive access to the ledger.
    pub fn lock(&self) -> Result<MutexGuard<'_, L>, LedgerError> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".to_string()))
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<LedgerError>,
        F: FnOnce(&mut L) -> Result<T, E>,
    {
        let mut guard = self.lock()?;
        f(&mut guard)
    }
}

/// Effect running `operation` against the environment's ledger.
///
/// # Example
///
/// ```
/// use vlm::contract::Contract;
/// use vlm::dispatch::Operation;
/// use vlm::effects::{invoke, SharedLedger};
/// use vlm::ledger::MemoryLedger;
/// use stillwater::prelude::*;
///
/// # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # runtime.block_on(async {
/// let ledger = SharedLedger::new(MemoryLedger::new());
/// let create = Operation::Create { chassis_no: "CH001".into() };
///
/// let payload = invoke(Contract::default(), create).run(&ledger).await.unwrap();
/// assert!(payload.is_empty());
/// # });
/// ```
pub fn invoke<L>(
    contract: Contract,
    operation: Operation,
) -> BoxedEffect<Vec<u8>, ContractError, SharedLedger<L>>
where
    L: Ledger + Send + 'static,
{
    from_fn(move |env: &SharedLedger<L>| {
        debug!(operation = operation.name(), "running invocation effect");
        env.with(|ledger| contract.execute(ledger, &operation))
    })
    .boxed()
}

/// Effect resolving `function` with `args` before running it.
///
/// Resolution failures surface as the effect's error without touching
/// the ledger.
pub fn invoke_named<L>(
    contract: Contract,
    function: &str,
    args: &[String],
) -> BoxedEffect<Vec<u8>, ContractError, SharedLedger<L>>
where
    L: Ledger + Send + 'static,
{
    match Operation::parse(function, args) {
        Ok(operation) => invoke(contract, operation),
        Err(e) => fail(e).boxed(),
    }
}
