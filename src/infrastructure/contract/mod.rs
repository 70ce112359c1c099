//! Typed greeter contract
//!
//! `Greeter` pairs a deployed address with an executor and hands out the
//! four method views: [`QueryMethods`], [`TxMethods`], [`BuildExtrinsic`]
//! and the mixed [`Methods`].

mod build_extrinsic;
mod mixed;
mod query;
mod shared;
mod tx;

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Log};

use crate::domain::contract::{decode_events, GreeterEvent};
use crate::infrastructure::ethereum::ContractExecutor;

pub use build_extrinsic::BuildExtrinsic;
pub use mixed::Methods;
pub use query::QueryMethods;
pub use shared::TxOutcome;
pub use tx::TxMethods;

/// Handle to a deployed greeter
#[derive(Clone)]
pub struct Greeter {
    address: Address,
    executor: Arc<dyn ContractExecutor>,
}

impl Greeter {
    pub fn new(address: Address, executor: Arc<dyn ContractExecutor>) -> Self {
        Self { address, executor }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Signer address transactions are sent from, if a wallet is connected
    pub fn caller(&self) -> Option<Address> {
        self.executor.caller()
    }

    pub fn executor(&self) -> &Arc<dyn ContractExecutor> {
        &self.executor
    }

    /// Same deployment, different executor (signer or endpoint)
    pub fn with_executor(&self, executor: Arc<dyn ContractExecutor>) -> Self {
        Self {
            address: self.address,
            executor,
        }
    }

    pub fn query(&self) -> QueryMethods<'_> {
        QueryMethods::new(self)
    }

    pub fn tx(&self) -> TxMethods<'_> {
        TxMethods::new(self)
    }

    pub fn build_extrinsic(&self) -> BuildExtrinsic<'_> {
        BuildExtrinsic::new(self)
    }

    pub fn methods(&self) -> Methods<'_> {
        Methods::new(self)
    }

    /// Decode the greeter events among `logs`
    pub fn decode_events(&self, logs: &[Log]) -> Vec<GreeterEvent> {
        decode_events(self.address, logs)
    }
}

impl fmt::Debug for Greeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Greeter")
            .field("address", &self.address)
            .field("endpoint", &self.executor.endpoint_name())
            .field("caller", &self.caller())
            .finish()
    }
}
