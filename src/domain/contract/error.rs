//! Errors surfaced by the typed bindings

use thiserror::Error;

use super::form::FormError;
use super::types::{GreeterError, LangError};

#[derive(Debug, Error)]
pub enum BindingError {
    /// The return value or revert payload could not be decoded
    #[error(transparent)]
    Lang(#[from] LangError),

    /// The contract rejected the call with one of its own errors
    #[error("contract error: {0}")]
    Contract(GreeterError),

    /// The call reverted with data the ABI does not describe
    #[error("call reverted (data: 0x{data})")]
    Reverted { data: String },

    /// The node or transport failed before the contract ran
    #[error("transport error: {0}")]
    Transport(String),

    /// A transaction was requested but no signer is configured
    #[error("wallet not connected")]
    NoSigner,

    /// Input rejected before any network call
    #[error(transparent)]
    Validation(#[from] FormError),
}

impl BindingError {
    /// Classify revert data into a contract error or an opaque revert.
    pub fn from_revert(data: &[u8]) -> Self {
        match GreeterError::from_revert(data) {
            Some(err) => Self::Contract(err),
            None => Self::Reverted {
                data: hex::encode(data),
            },
        }
    }

    pub fn transport(err: anyhow::Error) -> Self {
        Self::Transport(format!("{err:#}"))
    }

    pub fn contract_error(&self) -> Option<GreeterError> {
        match self {
            Self::Contract(err) => Some(*err),
            _ => None,
        }
    }
}
