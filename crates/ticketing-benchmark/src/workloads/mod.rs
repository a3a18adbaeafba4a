// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod generator;
pub mod passenger;
pub mod seat;

use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{ConfigurationError, WorkloadError};
use crate::ContractProxy;
use seat::SeatSelectionPolicy;

/// Identity of one worker within a round, assigned by the harness before any
/// transaction runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkerContext {
    pub worker_index: u64,
    pub total_workers: u64,
    pub round_index: u64,
    /// Round-scoped arguments, passed through untouched.
    pub round_arguments: serde_yaml::Mapping,
}

impl WorkerContext {
    pub fn new(worker_index: u64, total_workers: u64, round_index: u64) -> Self {
        Self {
            worker_index,
            total_workers,
            round_index,
            round_arguments: serde_yaml::Mapping::new(),
        }
    }

    pub fn with_round_arguments(mut self, round_arguments: serde_yaml::Mapping) -> Self {
        self.round_arguments = round_arguments;
        self
    }
}

/// What a worker does once, before its first transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitPolicy {
    /// Register a passenger that every later transaction of the worker reuses.
    RegisterPassenger,
    Skip,
}

/// What a worker submits on every iteration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadKind {
    /// Buy a seat for the worker's registered passenger.
    BuyTicket { seats: SeatSelectionPolicy },
    /// Register a fresh, throwaway passenger.
    RegisterPassenger,
}

impl WorkloadKind {
    pub fn workload_type(&self) -> WorkloadType {
        match self {
            WorkloadKind::BuyTicket { .. } => WorkloadType::BuyTicket,
            WorkloadKind::RegisterPassenger => WorkloadType::RegisterPassenger,
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Display, EnumIter)]
pub enum WorkloadType {
    #[strum(serialize = "buy_ticket")]
    BuyTicket,
    #[strum(serialize = "register_passenger")]
    RegisterPassenger,
}

/// Lifecycle a harness drives on each worker: `init` once, then
/// `generate_and_submit` as many times as the round asks for.
#[async_trait]
pub trait Workload: Send + Sync + std::fmt::Debug {
    async fn init(&mut self, proxy: Arc<dyn ContractProxy>) -> Result<(), ConfigurationError>;

    async fn generate_and_submit(
        &mut self,
        proxy: Arc<dyn ContractProxy>,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<(), WorkloadError>;

    fn get_workload_type(&self) -> WorkloadType;
}
