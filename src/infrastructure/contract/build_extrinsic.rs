//! Unsigned transaction builder

use alloy::rpc::types::TransactionRequest;

use crate::domain::contract::abi::{GET_BALANCE, GET_LOCK_STATE, GREET, SET_MESSAGE, UNLOCK};
use crate::domain::contract::{Balance, ContractCall, GasLimitAndRequiredValue, IGreeter};
use crate::infrastructure::ethereum::build_request;

use super::Greeter;

/// Builds submittable but unsigned transactions. Nothing is executed.
pub struct BuildExtrinsic<'a> {
    contract: &'a Greeter,
}

impl<'a> BuildExtrinsic<'a> {
    pub(super) fn new(contract: &'a Greeter) -> Self {
        Self { contract }
    }

    fn wrap(&self, call: ContractCall) -> TransactionRequest {
        build_request(self.contract.address(), self.contract.caller(), &call)
    }

    pub fn get_balance(&self, options: GasLimitAndRequiredValue) -> TransactionRequest {
        self.wrap(
            ContractCall::encode(&GET_BALANCE, &IGreeter::getBalanceCall {})
                .with_options(&GET_BALANCE, options),
        )
    }

    pub fn greet(&self, options: GasLimitAndRequiredValue) -> TransactionRequest {
        self.wrap(ContractCall::encode(&GREET, &IGreeter::greetCall {}).with_options(&GREET, options))
    }

    pub fn set_message(
        &self,
        new_message: impl Into<String>,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> TransactionRequest {
        self.wrap(
            ContractCall::encode(
                &SET_MESSAGE,
                &IGreeter::setMessageCall {
                    newMessage: new_message.into(),
                    value,
                },
            )
            .with_options(&SET_MESSAGE, options),
        )
    }

    pub fn get_lock_state(&self, options: GasLimitAndRequiredValue) -> TransactionRequest {
        self.wrap(
            ContractCall::encode(&GET_LOCK_STATE, &IGreeter::getLockStateCall {})
                .with_options(&GET_LOCK_STATE, options),
        )
    }

    pub fn unlock(&self, value: Balance, options: GasLimitAndRequiredValue) -> TransactionRequest {
        self.wrap(
            ContractCall::encode(&UNLOCK, &IGreeter::unlockCall { value })
                .with_options(&UNLOCK, options),
        )
    }
}
