// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use rand::{Rng, RngCore};
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::config::WorkloadConfig;
use crate::error::{ConfigurationError, InitError, TransportError, WorkloadError};
use crate::workloads::passenger::PassengerIdentity;
use crate::workloads::{InitPolicy, WorkerContext, Workload, WorkloadKind, WorkloadType};
use crate::{ContractProxy, TransactionRequest, BUY_TICKET_FUNCTION, REGISTER_PASSENGER_FUNCTION};

#[derive(Debug)]
enum GeneratorState {
    Uninitialized,
    Ready {
        passenger: Option<PassengerIdentity>,
    },
}

/// Per-worker generator of ticketing transactions.
///
/// `initialize` runs once and may register the passenger the worker buys
/// tickets for. A failed registration is logged and otherwise ignored so the
/// round can go on. Every later `submit` returns the proxy's error as is.
#[derive(Debug)]
pub struct TransactionWorkloadGenerator {
    context: WorkerContext,
    config: WorkloadConfig,
    clock: Arc<dyn Clock>,
    state: GeneratorState,
}

impl TransactionWorkloadGenerator {
    pub fn new(context: WorkerContext, config: WorkloadConfig) -> Result<Self, ConfigurationError> {
        Self::new_with_clock(context, config, Arc::new(SystemClock))
    }

    pub fn new_with_clock(
        context: WorkerContext,
        config: WorkloadConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            context,
            config,
            clock,
            state: GeneratorState::Uninitialized,
        })
    }

    pub fn new_boxed(
        context: WorkerContext,
        config: WorkloadConfig,
    ) -> Result<Box<dyn Workload>, ConfigurationError> {
        Ok(Box::new(Self::new(context, config)?))
    }

    pub fn worker_index(&self) -> u64 {
        self.context.worker_index
    }

    pub fn context(&self) -> &WorkerContext {
        &self.context
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GeneratorState::Ready { .. })
    }

    /// The passenger registered during initialization, if any.
    pub fn passenger(&self) -> Option<&PassengerIdentity> {
        match &self.state {
            GeneratorState::Ready { passenger } => passenger.as_ref(),
            GeneratorState::Uninitialized => None,
        }
    }

    pub async fn initialize(
        &mut self,
        proxy: &dyn ContractProxy,
    ) -> Result<(), ConfigurationError> {
        let worker_index = self.worker_index();
        if self.is_ready() {
            return Err(ConfigurationError::AlreadyInitialized { worker_index });
        }

        let passenger = match self.config.init_policy() {
            InitPolicy::Skip => {
                info!("Worker {worker_index}: Initialized without passenger registration");
                None
            }
            InitPolicy::RegisterPassenger => {
                let passenger =
                    PassengerIdentity::for_worker(worker_index, self.clock.now_millis());
                info!(
                    "Worker {worker_index}: Registering passenger {}",
                    passenger.id
                );
                let request = TransactionRequest::new_write(
                    &self.config.contract_id,
                    REGISTER_PASSENGER_FUNCTION,
                    passenger.registration_arguments(),
                );
                if let Err(source) = proxy.execute_transaction(request).await {
                    let err = InitError {
                        passenger_id: passenger.id.clone(),
                        source,
                    };
                    error!("Worker {worker_index}: {err}");
                }
                // Kept even when registration failed.
                Some(passenger)
            }
        };

        self.state = GeneratorState::Ready { passenger };
        Ok(())
    }

    /// Builds the next request without sending it.
    pub fn generate_transaction<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<TransactionRequest, ConfigurationError> {
        let (function, arguments) = match &self.config.workload {
            WorkloadKind::BuyTicket { seats } => {
                let passenger = self
                    .passenger()
                    .ok_or(ConfigurationError::MissingPassenger {
                        worker_index: self.worker_index(),
                    })?;
                let seat = seats.select_seat(self.worker_index(), self.clock.as_ref(), rng)?;
                (BUY_TICKET_FUNCTION, vec![seat, passenger.id.clone()])
            }
            WorkloadKind::RegisterPassenger => {
                let passenger = PassengerIdentity::ephemeral(rng);
                (
                    REGISTER_PASSENGER_FUNCTION,
                    passenger.registration_arguments(),
                )
            }
        };
        Ok(TransactionRequest::new_write(
            &self.config.contract_id,
            function,
            arguments,
        ))
    }

    pub async fn submit(
        &self,
        proxy: &dyn ContractProxy,
        request: TransactionRequest,
    ) -> Result<(), TransportError> {
        proxy.execute_transaction(request).await
    }

    pub async fn generate_and_submit<R: Rng + ?Sized>(
        &self,
        proxy: &dyn ContractProxy,
        rng: &mut R,
    ) -> Result<(), WorkloadError> {
        let request = self.generate_transaction(rng)?;
        self.submit(proxy, request).await?;
        Ok(())
    }
}

#[async_trait]
impl Workload for TransactionWorkloadGenerator {
    async fn init(&mut self, proxy: Arc<dyn ContractProxy>) -> Result<(), ConfigurationError> {
        self.initialize(proxy.as_ref()).await
    }

    async fn generate_and_submit(
        &mut self,
        proxy: Arc<dyn ContractProxy>,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<(), WorkloadError> {
        TransactionWorkloadGenerator::generate_and_submit(self, proxy.as_ref(), rng).await
    }

    fn get_workload_type(&self) -> WorkloadType {
        self.config.workload.workload_type()
    }
}
