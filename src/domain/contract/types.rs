//! Argument and return types for the greeter bindings

use alloy_primitives::Bytes;
use alloy_sol_types::{SolError, SolInterface};
use serde::Serialize;
use thiserror::Error;

use super::abi::IGreeter;

/// Native balance unit accepted by the contract (`uint128` on the ABI).
pub type Balance = u128;

/// Framework-level error raised when a return value cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum LangError {
    #[error("could not read input")]
    CouldNotReadInput,
}

/// Errors defined by the greeter contract itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum GreeterError {
    /// Returned if caller has insufficient balance
    #[error("insufficient balance")]
    InsufficientBalance,
    /// Returned if transfer failed
    #[error("transfer failed")]
    TransferFailed,
}

impl GreeterError {
    /// Decode revert data into a contract error, if it is one.
    pub fn from_revert(data: &[u8]) -> Option<Self> {
        match IGreeter::IGreeterErrors::abi_decode(data).ok()? {
            IGreeter::IGreeterErrors::InsufficientBalance(_) => Some(Self::InsufficientBalance),
            IGreeter::IGreeterErrors::TransferFailed(_) => Some(Self::TransferFailed),
        }
    }

    /// ABI-encode this error as revert data.
    pub fn to_revert(self) -> Bytes {
        match self {
            Self::InsufficientBalance => IGreeter::InsufficientBalance {}.abi_encode().into(),
            Self::TransferFailed => IGreeter::TransferFailed {}.abi_encode().into(),
        }
    }
}

/// Success/failure wrapper around a decoded value.
pub type ContractResult<T> = Result<T, LangError>;

/// Result of a query: the decoded value plus the raw output it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReturn<T> {
    pub value: ContractResult<T>,
    pub raw: Bytes,
}

impl<T> QueryReturn<T> {
    pub fn new(value: ContractResult<T>, raw: Bytes) -> Self {
        Self { value, raw }
    }

    /// Unwrap the decoded value, turning a decode failure into a binding error.
    pub fn into_value(self) -> Result<T, super::BindingError> {
        self.value.map_err(super::BindingError::Lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_roundtrips_through_revert_data() {
        for err in [GreeterError::InsufficientBalance, GreeterError::TransferFailed] {
            assert_eq!(GreeterError::from_revert(&err.to_revert()), Some(err));
        }
    }

    #[test]
    fn test_unknown_revert_is_not_a_contract_error() {
        assert_eq!(GreeterError::from_revert(&[]), None);
        assert_eq!(GreeterError::from_revert(&[0xde, 0xad, 0xbe, 0xef]), None);
    }
}
