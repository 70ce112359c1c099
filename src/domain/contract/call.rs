//! Call options and the request handed to the executor

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use super::abi::MethodSpec;

/// Options for read-only calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimit {
    pub gas_limit: Option<u64>,
}

impl GasLimit {
    pub fn new(gas_limit: Option<u64>) -> Self {
        Self { gas_limit }
    }
}

/// Options for state-changing calls: gas cap plus attached native value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimitAndRequiredValue {
    pub gas_limit: Option<u64>,
    pub value: U256,
}

impl GasLimitAndRequiredValue {
    pub fn new(gas_limit: Option<u64>, value: U256) -> Self {
        Self { gas_limit, value }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

impl From<GasLimit> for GasLimitAndRequiredValue {
    fn from(options: GasLimit) -> Self {
        Self {
            gas_limit: options.gas_limit,
            value: U256::ZERO,
        }
    }
}

/// An encoded contract call, ready to be queried, sent or wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub method: &'static str,
    pub selector: [u8; 4],
    pub calldata: Bytes,
    pub gas_limit: Option<u64>,
    pub value: U256,
}

impl ContractCall {
    /// Encode a generated call struct. Arguments keep their declared order.
    pub fn encode<C: SolCall>(method: &MethodSpec, call: &C) -> Self {
        Self {
            method: method.name,
            selector: method.selector,
            calldata: call.abi_encode().into(),
            gas_limit: None,
            value: U256::ZERO,
        }
    }

    pub fn with_gas(mut self, options: GasLimit) -> Self {
        self.gas_limit = options.gas_limit;
        self
    }

    /// Apply gas and value. Value is only attached to payable methods.
    pub fn with_options(mut self, method: &MethodSpec, options: GasLimitAndRequiredValue) -> Self {
        self.gas_limit = options.gas_limit;
        self.value = if method.payable {
            options.value
        } else {
            U256::ZERO
        };
        self
    }
}
