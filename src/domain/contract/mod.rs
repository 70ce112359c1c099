//! Greeter contract domain model
//!
//! ABI declaration, argument/return types, call options, events and
//! errors. Nothing here talks to a node.

pub mod abi;
mod call;
mod error;
mod events;
mod form;
mod types;

pub use abi::{DecodedArg, IGreeter, MethodSpec, METHODS};
pub use call::{ContractCall, GasLimit, GasLimitAndRequiredValue};
pub use error::BindingError;
pub use events::{decode_events, GreeterEvent};
pub use form::{FormError, UpdateGreeting, MESSAGE_MAX_LEN, MESSAGE_MIN_LEN};
pub use types::{Balance, ContractResult, GreeterError, LangError, QueryReturn};
