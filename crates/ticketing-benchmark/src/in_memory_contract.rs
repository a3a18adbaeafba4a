// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, TimeZone, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::TransportError;
use crate::workloads::seat::DEFAULT_SEATS;
use crate::{
    ContractProxy, TransactionRequest, BUY_TICKET_FUNCTION, INIT_LEDGER_FUNCTION,
    REGISTER_PASSENGER_FUNCTION, TICKETING_CONTRACT_ID,
};

/// Price of a seat that did not exist before its first purchase.
pub const AUTO_CREATED_SEAT_PRICE: i64 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registered_time: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Available,
    Sold,
}

/// Missing fields decode to their defaults, so any document stored under a
/// seat key reads as a ticket that has not been sold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    pub seat_number: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub price: i64,
    pub status: TicketStatus,
    pub org_type: String,
}

impl Ticket {
    fn available(seat_number: &str, price: i64, org_type: &str) -> Self {
        Self {
            seat_number: seat_number.to_string(),
            owner_id: String::new(),
            price,
            status: TicketStatus::Available,
            org_type: org_type.to_string(),
        }
    }
}

#[derive(Debug, Error)]
enum ContractError {
    #[error("the passenger {0} already exists")]
    PassengerExists(String),

    #[error("passenger {0} does not exist")]
    PassengerNotFound(String),

    #[error("seat {0} is already sold")]
    SeatSold(String),

    #[error("unknown function {0}")]
    UnknownFunction(String),

    #[error("{function} expects {expected} arguments, got {actual}")]
    WrongArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode world state: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ContractError> for TransportError {
    fn from(err: ContractError) -> Self {
        TransportError::Rejected(err.to_string())
    }
}

type WriteSet = Vec<(String, Vec<u8>)>;

/// In-process stand-in for the ticketing chaincode.
///
/// World state is a key to JSON document map shared by passengers and seats,
/// like the ledger it replaces. A transaction is simulated against the current
/// state and its writes are committed only when the request is not read-only.
#[derive(Debug)]
pub struct InMemoryTicketingContract {
    contract_id: String,
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    commit_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
    num_submitted: AtomicU64,
}

impl Default for InMemoryTicketingContract {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTicketingContract {
    pub fn new() -> Self {
        Self::new_with_clock(Arc::new(SystemClock))
    }

    pub fn new_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            contract_id: TICKETING_CONTRACT_ID.to_string(),
            state: RwLock::new(BTreeMap::new()),
            commit_lock: Mutex::new(()),
            clock,
            num_submitted: AtomicU64::new(0),
        }
    }

    /// A contract whose ledger already holds the `InitLedger` seats.
    pub fn try_new_seeded() -> Result<Self, TransportError> {
        let contract = Self::new();
        let writes = contract.init_ledger()?;
        contract.commit(writes);
        Ok(contract)
    }

    pub fn num_submitted(&self) -> u64 {
        self.num_submitted.load(Ordering::Relaxed)
    }

    pub fn passenger(&self, id: &str) -> Option<Passenger> {
        self.get(id)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    pub fn ticket(&self, seat_number: &str) -> Option<Ticket> {
        self.get(seat_number)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().get(key).cloned()
    }

    fn commit(&self, writes: WriteSet) {
        let mut state = self.state.write();
        for (key, value) in writes {
            state.insert(key, value);
        }
    }

    fn init_ledger(&self) -> Result<WriteSet, ContractError> {
        let prices = [50, 20, 200];
        let org_types = ["Railway", "Bus", "Airway"];
        let mut writes = vec![];
        for ((seat, price), org_type) in DEFAULT_SEATS.iter().zip(prices).zip(org_types) {
            let ticket = Ticket::available(seat, price, org_type);
            writes.push((seat.to_string(), serde_json::to_vec(&ticket)?));
        }
        Ok(writes)
    }

    fn register_passenger(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<WriteSet, ContractError> {
        if self.get(id).is_some() {
            return Err(ContractError::PassengerExists(id.to_string()));
        }
        let registered_time = Utc
            .timestamp_millis_opt(self.clock.now_millis() as i64)
            .single()
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let passenger = Passenger {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            registered_time,
        };
        Ok(vec![(id.to_string(), serde_json::to_vec(&passenger)?)])
    }

    fn buy_ticket(&self, seat_number: &str, passenger_id: &str) -> Result<WriteSet, ContractError> {
        if self.get(passenger_id).is_none() {
            return Err(ContractError::PassengerNotFound(passenger_id.to_string()));
        }
        let mut ticket = match self.get(seat_number) {
            Some(bytes) => serde_json::from_slice::<Ticket>(&bytes)?,
            // Unknown seats are created on first purchase.
            None => Ticket::available(seat_number, AUTO_CREATED_SEAT_PRICE, "Benchmark"),
        };
        if ticket.status == TicketStatus::Sold {
            return Err(ContractError::SeatSold(seat_number.to_string()));
        }
        ticket.status = TicketStatus::Sold;
        ticket.owner_id = passenger_id.to_string();
        Ok(vec![(seat_number.to_string(), serde_json::to_vec(&ticket)?)])
    }

    fn simulate(&self, request: &TransactionRequest) -> Result<WriteSet, ContractError> {
        let args = &request.contract_arguments;
        let expect_args = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ContractError::WrongArgumentCount {
                    function: request.contract_function.clone(),
                    expected,
                    actual: args.len(),
                })
            }
        };
        match request.contract_function.as_str() {
            INIT_LEDGER_FUNCTION => {
                expect_args(0)?;
                self.init_ledger()
            }
            REGISTER_PASSENGER_FUNCTION => {
                expect_args(3)?;
                self.register_passenger(&args[0], &args[1], &args[2])
            }
            BUY_TICKET_FUNCTION => {
                expect_args(2)?;
                self.buy_ticket(&args[0], &args[1])
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

#[async_trait]
impl ContractProxy for InMemoryTicketingContract {
    async fn execute_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<(), TransportError> {
        self.num_submitted.fetch_add(1, Ordering::Relaxed);
        if request.contract_id != self.contract_id {
            return Err(TransportError::Unavailable(format!(
                "no contract deployed as {}",
                request.contract_id
            )));
        }
        // Simulate and commit atomically so two purchases of one seat cannot both succeed.
        let _guard = self.commit_lock.lock();
        let writes = self.simulate(&request).map_err(|err| {
            debug!("{} rejected: {err}", request.contract_function);
            TransportError::from(err)
        })?;
        if !request.read_only {
            self.commit(writes);
        }
        Ok(())
    }
}
