//! Ethereum infrastructure - contract executors

mod devchain;
mod provider;

pub use devchain::{DevChain, GreeterState, DEV_ACCOUNT, DEV_CONTRACT};
pub use provider::{
    build_request, create_executor, AlloyExecutor, CallOutput, ContractAddresses, ContractExecutor,
    ExecutorReceipt, ProviderConfig, SendOutcome,
};
