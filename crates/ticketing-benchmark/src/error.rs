// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failure reported by a [`crate::ContractProxy`] for a single request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transaction rejected by contract: {0}")]
    Rejected(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the one-time passenger registration. Never returned from
/// `initialize`; it only exists to be logged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Failed to register passenger {passenger_id}: {source}")]
pub struct InitError {
    pub passenger_id: String,
    #[source]
    pub source: TransportError,
}

/// Misuse of a workload generator. Fatal to the generator instance.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Fixed seat selection requires at least one seat label")]
    EmptySeatSet,

    #[error("Worker {worker_index} has no registered passenger, initialize the workload with passenger registration first")]
    MissingPassenger { worker_index: u64 },

    #[error("Worker {worker_index} is already initialized")]
    AlreadyInitialized { worker_index: u64 },

    #[error("Buy-ticket workloads need passenger registration during initialization")]
    RegistrationRequired,
}

/// Error of a single generate-and-submit iteration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkloadError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
