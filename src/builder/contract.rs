//! Builder for assembling a contract.

use crate::builder::error::BuildError;
use crate::config::{CreatePolicy, EngineConfig};
use crate::contract::Contract;
use crate::core::{LifecycleTable, TransitionRule};
use crate::history::{TimestampFormat, TimestampFormatter};
use std::sync::Arc;

/// Builder for [`Contract`] with a fluent API.
///
/// Unset pieces fall back to [`EngineConfig::default`], the standard
/// transition table and the configured timestamp format.
pub struct ContractBuilder {
    config: EngineConfig,
    table: Option<LifecycleTable>,
    rules: Vec<TransitionRule>,
    formatter: Option<Arc<dyn TimestampFormatter>>,
}

impl ContractBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            table: None,
            rules: Vec::new(),
            formatter: None,
        }
    }

    /// Start from a loaded configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Owner written into newly created records.
    pub fn manufacturer(mut self, name: impl Into<String>) -> Self {
        self.config.manufacturer = name.into();
        self
    }

    pub fn create_policy(mut self, policy: CreatePolicy) -> Self {
        self.config.create_policy = policy;
        self
    }

    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Install a custom timestamp formatter; overrides `timestamp_format`.
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: TimestampFormatter + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Replace the whole transition table.
    pub fn table(mut self, table: LifecycleTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Add a rule to a custom table built from rules alone.
    pub fn rule(mut self, rule: TransitionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Build the contract.
    /// Returns an error if the configuration is invalid or the table is empty.
    pub fn build(self) -> Result<Contract, BuildError> {
        self.config.validate()?;

        let table = match (self.table, self.rules.is_empty()) {
            (Some(table), true) => table,
            (Some(table), false) => {
                let mut rules = table.rules().to_vec();
                rules.extend(self.rules);
                LifecycleTable::new(rules)
            }
            (None, false) => LifecycleTable::new(self.rules),
            (None, true) => LifecycleTable::standard(),
        };
        if table.rules().is_empty() {
            return Err(BuildError::NoRules);
        }

        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(self.config.timestamp_format));

        Ok(Contract::from_parts(self.config, table, formatter))
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}
