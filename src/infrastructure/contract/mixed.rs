//! Reads as queries, writes as transactions

use crate::domain::contract::{
    Balance, BindingError, GasLimit, GasLimitAndRequiredValue, QueryReturn,
};

use super::query::QueryMethods;
use super::shared::TxOutcome;
use super::tx::TxMethods;
use super::Greeter;

/// The method set a UI usually wants
pub struct Methods<'a> {
    query: QueryMethods<'a>,
    tx: TxMethods<'a>,
}

impl<'a> Methods<'a> {
    pub(super) fn new(contract: &'a Greeter) -> Self {
        Self {
            query: QueryMethods::new(contract),
            tx: TxMethods::new(contract),
        }
    }

    pub async fn get_balance(&self, options: GasLimit) -> Result<QueryReturn<Balance>, BindingError> {
        self.query.get_balance(options).await
    }

    pub async fn greet(&self, options: GasLimit) -> Result<QueryReturn<String>, BindingError> {
        self.query.greet(options).await
    }

    pub async fn set_message(
        &self,
        new_message: impl Into<String>,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.tx.set_message(new_message, value, options).await
    }

    pub async fn get_lock_state(&self, options: GasLimit) -> Result<QueryReturn<bool>, BindingError> {
        self.query.get_lock_state(options).await
    }

    pub async fn unlock(
        &self,
        value: Balance,
        options: GasLimitAndRequiredValue,
    ) -> Result<TxOutcome, BindingError> {
        self.tx.unlock(value, options).await
    }
}
