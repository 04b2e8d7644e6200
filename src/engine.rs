//! Validated lifecycle transitions against a ledger.
//!
//! Every mutating operation follows the same shape: read the current record,
//! ask the [`LifecycleTable`] for the next status, write exactly one new
//! version. Nothing is written until every check has passed, so a failed
//! invocation leaves the ledger untouched. The engine reads no clock and no
//! randomness; every executor replaying an invocation computes the same write.

use crate::config::{CreatePolicy, EngineConfig};
use crate::core::{Action, LifecycleTable, VehicleRecord, VehicleStatus};
use crate::error::ContractError;
use crate::ledger::Ledger;
use tracing::{debug, info, warn};

pub struct LifecycleEngine<'a, L: Ledger> {
    ledger: &'a mut L,
    config: &'a EngineConfig,
    table: &'a LifecycleTable,
}

impl<'a, L: Ledger> LifecycleEngine<'a, L> {
    pub fn new(ledger: &'a mut L, config: &'a EngineConfig, table: &'a LifecycleTable) -> Self {
        Self {
            ledger,
            config,
            table,
        }
    }

    /// Register a new vehicle held by the configured manufacturer.
    pub fn create(&mut self, chassis_no: &str) -> Result<VehicleRecord, ContractError> {
        if chassis_no.is_empty() {
            return Err(ContractError::InvalidArguments {
                function: "createCar".to_string(),
                problems: vec!["chassis number is empty".to_string()],
            });
        }
        if self.config.create_policy == CreatePolicy::Reject
            && self.ledger.get_state(chassis_no)?.is_some()
        {
            warn!(chassis_no, "create rejected, record exists");
            return Err(ContractError::AlreadyExists(chassis_no.to_string()));
        }

        let record = VehicleRecord::manufactured(chassis_no, self.config.manufacturer.as_str());
        self.store(chassis_no, &record)?;
        info!(chassis_no, owner = %record.owner, "vehicle created");
        Ok(record)
    }

    /// Hand a new vehicle to a dealer.
    pub fn transfer(
        &mut self,
        chassis_no: &str,
        new_owner: &str,
    ) -> Result<VehicleRecord, ContractError> {
        self.apply(Action::Transfer, chassis_no, |current, status| VehicleRecord {
            chassis_no: current.chassis_no,
            owner: new_owner.to_string(),
            registration_no: String::new(),
            registration_expiry: String::new(),
            status,
        })
    }

    /// Sell to a customer and record the registration.
    pub fn sell_and_register(
        &mut self,
        chassis_no: &str,
        new_owner: &str,
        registration_no: &str,
        registration_expiry: &str,
    ) -> Result<VehicleRecord, ContractError> {
        self.apply(Action::SellAndRegister, chassis_no, |current, status| {
            VehicleRecord {
                chassis_no: current.chassis_no,
                owner: new_owner.to_string(),
                registration_no: registration_no.to_string(),
                registration_expiry: registration_expiry.to_string(),
                status,
            }
        })
    }

    /// Take a vehicle off the road. Scrapping a scrapped vehicle is accepted
    /// and appends another `Scrapped` version.
    pub fn scrap(&mut self, chassis_no: &str) -> Result<VehicleRecord, ContractError> {
        self.apply(Action::Scrap, chassis_no, |current, status| VehicleRecord {
            status,
            ..current
        })
    }

    /// Stored bytes for `chassis_no`, verbatim; `None` if never written.
    pub fn get(&self, chassis_no: &str) -> Result<Option<Vec<u8>>, ContractError> {
        let bytes = self.ledger.get_state(chassis_no)?;
        debug!(chassis_no, found = bytes.is_some(), "vehicle read");
        Ok(bytes)
    }

    /// Decoded current record. A missing key is `Ok(None)`; a corrupt value
    /// is `Unmarshal`.
    pub fn record(&self, chassis_no: &str) -> Result<Option<VehicleRecord>, ContractError> {
        self.get(chassis_no)?
            .map(|bytes| VehicleRecord::from_bytes(chassis_no, &bytes))
            .transpose()
    }

    fn apply<F>(
        &mut self,
        action: Action,
        chassis_no: &str,
        update: F,
    ) -> Result<VehicleRecord, ContractError>
    where
        F: FnOnce(VehicleRecord, VehicleStatus) -> VehicleRecord,
    {
        let current = self
            .record(chassis_no)?
            .ok_or_else(|| ContractError::RecordNotFound(chassis_no.to_string()))?;
        let from = current.status;

        let Some(next) = self.table.next_status(action, from) else {
            warn!(chassis_no, %action, %from, "transition rejected");
            return Err(ContractError::InvalidTransition {
                chassis_no: chassis_no.to_string(),
                action,
                from,
            });
        };

        let updated = update(current, next);
        self.store(chassis_no, &updated)?;
        info!(
            chassis_no,
            %action,
            %from,
            to = %updated.status,
            owner = %updated.owner,
            "vehicle updated"
        );
        Ok(updated)
    }

    fn store(&mut self, chassis_no: &str, record: &VehicleRecord) -> Result<(), ContractError> {
        let bytes = record.to_bytes()?;
        self.ledger.put_state(chassis_no, bytes)?;
        Ok(())
    }
}
