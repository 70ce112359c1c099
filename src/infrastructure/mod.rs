//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Typed greeter bindings (query / tx / extrinsic / mixed)
//! - Contract executors: Alloy JSON-RPC and the in-process dev chain
//! - Tokio runtime bridge for async operations

pub mod contract;
pub mod ethereum;
pub mod runtime;
