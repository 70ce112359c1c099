//! Read-only dispatch: every method executed as a dry run

use crate::domain::contract::abi::{GET_BALANCE, GET_LOCK_STATE, GREET, SET_MESSAGE, UNLOCK};
use crate::domain::contract::{
    Balance, BindingError, ContractCall, GasLimit, GasLimitAndRequiredValue, GreeterError,
    IGreeter, QueryReturn,
};

use super::shared::{query_fallible, query_value};
use super::Greeter;

/// Query view of a [`Greeter`]. Nothing here changes chain state.
pub struct QueryMethods<'a> {
    contract: &'a Greeter,
}

impl<'a> QueryMethods<'a> {
    pub(super) fn new(contract: &'a Greeter) -> Self {
        Self { contract }
    }

    /// Native balance held by the contract
    pub async fn get_balance(&self, options: GasLimit) -> Result<QueryReturn<Balance>, BindingError> {
        let call = ContractCall::encode(&GET_BALANCE, &IGreeter::getBalanceCall {}).with_gas(options);
        query_value::<IGreeter::getBalanceCall>(
            self.contract.executor().as_ref(),
            self.contract.address(),
            call,
        )
        .await
    }

    /// Current greeting
    pub async fn greet(&self, options: GasLimit) -> Result<QueryReturn<String>, BindingError> {
        let call = ContractCall::encode(&GREET, &IGreeter::greetCall {}).with_gas(options);
        query_value::<IGreeter::greetCall>(
            self.contract.executor().as_ref(),
            self.contract.address(),
            call,
        )
        .await
    }

    /// Dry run of `setMessage`
    pub async fn set_message(
        &self,
        new_message: impl Into<String>,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<QueryReturn<Result<(), GreeterError>>, BindingError> {
        let call = ContractCall::encode(
            &SET_MESSAGE,
            &IGreeter::setMessageCall {
                newMessage: new_message.into(),
                value,
            },
        )
        .with_options(&SET_MESSAGE, options);
        query_fallible(self.contract.executor().as_ref(), self.contract.address(), call).await
    }

    pub async fn get_lock_state(&self, options: GasLimit) -> Result<QueryReturn<bool>, BindingError> {
        let call =
            ContractCall::encode(&GET_LOCK_STATE, &IGreeter::getLockStateCall {}).with_gas(options);
        query_value::<IGreeter::getLockStateCall>(
            self.contract.executor().as_ref(),
            self.contract.address(),
            call,
        )
        .await
    }

    /// Dry run of `unlock`
    pub async fn unlock(
        &self,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<QueryReturn<Result<(), GreeterError>>, BindingError> {
        let call = ContractCall::encode(&UNLOCK, &IGreeter::unlockCall { value })
            .with_options(&UNLOCK, options);
        query_fallible(self.contract.executor().as_ref(), self.contract.address(), call).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::domain::contract::LangError;
    use crate::infrastructure::ethereum::{DevChain, GreeterState, DEV_CONTRACT};

    use super::*;

    fn greeter(state: GreeterState) -> Greeter {
        Greeter::new(DEV_CONTRACT, Arc::new(DevChain::with_state(state)))
    }

    #[tokio::test]
    async fn test_greet_returns_stored_message() {
        let contract = greeter(GreeterState::new("gm", false, 0));
        let greeting = contract.query().greet(GasLimit::default()).await.unwrap();
        assert_eq!(greeting.value, Ok("gm".to_string()));
        assert!(!greeting.raw.is_empty());
    }

    #[tokio::test]
    async fn test_set_message_dry_run_reports_contract_error() {
        let contract = greeter(GreeterState::default());
        let result = contract
            .query()
            .set_message("cheap", 99, GasLimitAndRequiredValue::default())
            .await
            .unwrap();
        assert_eq!(result.value, Ok(Err(GreeterError::InsufficientBalance)));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_state_untouched() {
        let contract = greeter(GreeterState::default());
        let result = contract
            .query()
            .set_message("dry", 100, GasLimitAndRequiredValue::default())
            .await
            .unwrap();
        assert_eq!(result.value, Ok(Ok(())));

        let greeting = contract.query().greet(GasLimit::default()).await.unwrap();
        assert_eq!(greeting.into_value().unwrap(), "Hello ink!");
    }

    #[tokio::test]
    async fn test_wrong_address_is_a_transport_error() {
        let contract = Greeter::new(alloy::primitives::Address::ZERO, Arc::new(DevChain::new()));
        let err = contract.query().greet(GasLimit::default()).await.unwrap_err();
        assert!(matches!(err, BindingError::Transport(_)));
    }

    #[test]
    fn test_lang_error_message() {
        assert_eq!(LangError::CouldNotReadInput.to_string(), "could not read input");
    }
}
