// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod config;
pub mod error;
pub mod in_memory_contract;
pub mod workloads;

pub use error::{ConfigurationError, InitError, TransportError, WorkloadError};
pub use workloads::generator::TransactionWorkloadGenerator;

/// Contract id the ticketing chaincode is deployed under.
pub const TICKETING_CONTRACT_ID: &str = "ticketing";

pub const REGISTER_PASSENGER_FUNCTION: &str = "RegisterPassenger";
pub const BUY_TICKET_FUNCTION: &str = "BuyTicket";
pub const INIT_LEDGER_FUNCTION: &str = "InitLedger";

/// A single contract invocation handed to the [`ContractProxy`].
///
/// Field names follow the harness wire format (`contractId`, `contractFunction`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub contract_id: String,
    pub contract_function: String,
    pub contract_arguments: Vec<String>,
    pub read_only: bool,
}

impl TransactionRequest {
    /// A state-changing invocation of `function` on `contract_id`.
    pub fn new_write(
        contract_id: impl Into<String>,
        function: impl Into<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            contract_id: contract_id.into(),
            contract_function: function.into(),
            contract_arguments: arguments,
            read_only: false,
        }
    }
}

/// The only boundary to the ledger. Implementations own connection handling,
/// timeouts and cancellation.
#[async_trait]
pub trait ContractProxy: Send + Sync {
    async fn execute_transaction(&self, request: TransactionRequest)
        -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_harness_field_names() {
        let request = TransactionRequest::new_write(
            TICKETING_CONTRACT_ID,
            BUY_TICKET_FUNCTION,
            vec!["RAIL-A1".to_string(), "Passenger_Worker0_1".to_string()],
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contractId"], "ticketing");
        assert_eq!(json["contractFunction"], "BuyTicket");
        assert_eq!(json["contractArguments"][0], "RAIL-A1");
        assert_eq!(json["readOnly"], false);
    }
}
