//! Signed dispatch: every method submitted as a transaction

use crate::domain::contract::abi::{GET_BALANCE, GET_LOCK_STATE, GREET, SET_MESSAGE, UNLOCK};
use crate::domain::contract::{
    Balance, BindingError, ContractCall, GasLimitAndRequiredValue, IGreeter,
};

use super::shared::{sign_and_send, TxOutcome};
use super::Greeter;

/// Transaction view of a [`Greeter`]
pub struct TxMethods<'a> {
    contract: &'a Greeter,
}

impl<'a> TxMethods<'a> {
    pub(super) fn new(contract: &'a Greeter) -> Self {
        Self { contract }
    }

    async fn send(&self, call: ContractCall) -> Result<TxOutcome, BindingError> {
        sign_and_send(self.contract.executor().as_ref(), self.contract.address(), call).await
    }

    pub async fn get_balance(
        &self,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.send(
            ContractCall::encode(&GET_BALANCE, &IGreeter::getBalanceCall {})
                .with_options(&GET_BALANCE, options),
        )
        .await
    }

    pub async fn greet(&self, options: GasLimitAndRequiredValue) -> Result<TxOutcome, BindingError> {
        self.send(ContractCall::encode(&GREET, &IGreeter::greetCall {}).with_options(&GREET, options))
            .await
    }

    /// Replace the greeting. `value` must be at least 100.
    pub async fn set_message(
        &self,
        new_message: impl Into<String>,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.send(
            ContractCall::encode(
                &SET_MESSAGE,
                &IGreeter::setMessageCall {
                    newMessage: new_message.into(),
                    value,
                },
            )
            .with_options(&SET_MESSAGE, options),
        )
        .await
    }

    pub async fn get_lock_state(
        &self,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.send(
            ContractCall::encode(&GET_LOCK_STATE, &IGreeter::getLockStateCall {})
                .with_options(&GET_LOCK_STATE, options),
        )
        .await
    }

    /// Unlock the contract. `value` must be at least 1000.
    pub async fn unlock(
        &self,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.send(
            ContractCall::encode(&UNLOCK, &IGreeter::unlockCall { value })
                .with_options(&UNLOCK, options),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::domain::contract::{GreeterError, GreeterEvent};
    use crate::infrastructure::ethereum::{DevChain, GreeterState, DEV_CONTRACT};

    use super::*;

    #[tokio::test]
    async fn test_locked_contract_emits_event() {
        let chain = DevChain::with_state(GreeterState::new("You won!", true, 6));
        let contract = Greeter::new(DEV_CONTRACT, Arc::new(chain.clone()));

        let outcome = contract
            .tx()
            .set_message("ignored", 100, GasLimitAndRequiredValue::default())
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.block_number, Some(1));
        assert_eq!(
            outcome.events,
            vec![GreeterEvent::Locked {
                message: "Contract is Locked!".to_string()
            }]
        );
        assert_eq!(chain.greeter_state().unwrap().message, "You won!");
    }

    #[tokio::test]
    async fn test_rejected_unlock_maps_to_contract_error() {
        let contract = Greeter::new(DEV_CONTRACT, Arc::new(DevChain::new()));
        let err = contract
            .tx()
            .unlock(999, GasLimitAndRequiredValue::default())
            .await
            .unwrap_err();
        assert_eq!(err.contract_error(), Some(GreeterError::InsufficientBalance));
    }

    #[tokio::test]
    async fn test_missing_signer_short_circuits() {
        let chain = DevChain::new().with_signer(None);
        let contract = Greeter::new(DEV_CONTRACT, Arc::new(chain.clone()));
        let err = contract
            .tx()
            .set_message("hi", 100, GasLimitAndRequiredValue::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BindingError::NoSigner));
        assert_eq!(chain.block_number().unwrap(), 0);
    }
}
