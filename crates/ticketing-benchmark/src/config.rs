// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::workloads::seat::SeatSelectionPolicy;
use crate::workloads::{InitPolicy, WorkloadKind};
use crate::TICKETING_CONTRACT_ID;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkloadConfig {
    #[serde(default = "default_contract_id")]
    pub contract_id: String,
    /// Defaults to registering a passenger for buy-ticket workloads and to
    /// skipping for registration-only workloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<InitPolicy>,
    pub workload: WorkloadKind,
}

fn default_contract_id() -> String {
    TICKETING_CONTRACT_ID.to_string()
}

impl WorkloadConfig {
    pub fn new(workload: WorkloadKind) -> Self {
        Self {
            contract_id: default_contract_id(),
            init: None,
            workload,
        }
    }

    /// Buy one of the seats `InitLedger` creates.
    pub fn buy_ticket_fixed_seats() -> Self {
        Self::new(WorkloadKind::BuyTicket {
            seats: SeatSelectionPolicy::default(),
        })
    }

    /// Buy a freshly named seat on every iteration, so the run never runs out of inventory.
    pub fn buy_ticket_unique_seats() -> Self {
        Self::new(WorkloadKind::BuyTicket {
            seats: SeatSelectionPolicy::Unique,
        })
    }

    pub fn register_passenger() -> Self {
        Self::new(WorkloadKind::RegisterPassenger)
    }

    pub fn init_policy(&self) -> InitPolicy {
        self.init.unwrap_or(match self.workload {
            WorkloadKind::BuyTicket { .. } => InitPolicy::RegisterPassenger,
            WorkloadKind::RegisterPassenger => InitPolicy::Skip,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let WorkloadKind::BuyTicket { seats } = &self.workload {
            seats.validate()?;
            if self.init_policy() == InitPolicy::Skip {
                return Err(ConfigurationError::RegistrationRequired);
            }
        }
        Ok(())
    }
}

/// Load and validate a workload configuration file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<WorkloadConfig> {
    let path = path.as_ref();
    let config: WorkloadConfig = serde_yaml::from_reader(
        std::fs::File::open(path).with_context(|| format!("cannot open {:?}", path))?,
    )
    .with_context(|| format!("cannot parse {:?}", path))?;
    config.validate()?;
    Ok(config)
}
