//! Dispatch helpers shared by the query, tx and mixed method sets

use alloy::primitives::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::{debug, Level};

use crate::domain::contract::{
    abi::decode_arguments, decode_events, BindingError, ContractCall, GreeterError, GreeterEvent,
    LangError, QueryReturn,
};
use crate::infrastructure::ethereum::{CallOutput, ContractExecutor, SendOutcome};

/// What a submitted transaction produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
    pub events: Vec<GreeterEvent>,
}

fn trace_call(kind: &'static str, contract: Address, call: &ContractCall) {
    if !tracing::enabled!(target: "bindings", Level::DEBUG) {
        return;
    }
    let args = match decode_arguments(&call.calldata) {
        Ok((_, args)) => args
            .iter()
            .map(|arg| format!("{}={}", arg.name, arg.value))
            .collect::<Vec<_>>()
            .join(", "),
        Err(err) => format!("<{err}>"),
    };
    debug!(
        target: "bindings",
        kind,
        %contract,
        method = call.method,
        value = %call.value,
        gas_limit = ?call.gas_limit,
        "{}({})",
        call.method,
        args
    );
}

async fn raw_query(
    executor: &dyn ContractExecutor,
    contract: Address,
    call: &ContractCall,
) -> Result<CallOutput, BindingError> {
    trace_call("query", contract, call);
    executor
        .query(contract, call)
        .await
        .map_err(BindingError::transport)
}

/// Query a read method and decode its return value.
///
/// A revert on a read method means the output could not be read.
pub(crate) async fn query_value<C: SolCall>(
    executor: &dyn ContractExecutor,
    contract: Address,
    call: ContractCall,
) -> Result<QueryReturn<C::Return>, BindingError> {
    Ok(match raw_query(executor, contract, &call).await? {
        CallOutput::Success(raw) => {
            let value = C::abi_decode_returns(&raw).map_err(|err| {
                debug!(target: "bindings", method = call.method, error = %err, "Undecodable return");
                LangError::CouldNotReadInput
            });
            QueryReturn::new(value, raw)
        }
        CallOutput::Revert(raw) => QueryReturn::new(Err(LangError::CouldNotReadInput), raw),
    })
}

/// Dry-run a mutating method. Contract errors come back as `Ok(Err(_))`.
pub(crate) async fn query_fallible(
    executor: &dyn ContractExecutor,
    contract: Address,
    call: ContractCall,
) -> Result<QueryReturn<Result<(), GreeterError>>, BindingError> {
    Ok(match raw_query(executor, contract, &call).await? {
        CallOutput::Success(raw) => QueryReturn::new(Ok(Ok(())), raw),
        CallOutput::Revert(raw) => {
            let value = GreeterError::from_revert(&raw)
                .map(Err)
                .ok_or(LangError::CouldNotReadInput);
            QueryReturn::new(value, raw)
        }
    })
}

/// Sign, submit and wait for a transaction, decoding the events it emitted.
pub(crate) async fn sign_and_send(
    executor: &dyn ContractExecutor,
    contract: Address,
    call: ContractCall,
) -> Result<TxOutcome, BindingError> {
    if executor.caller().is_none() {
        return Err(BindingError::NoSigner);
    }
    trace_call("tx", contract, &call);

    let outcome = executor
        .sign_and_send(contract, &call)
        .await
        .map_err(BindingError::transport)?;

    match outcome {
        SendOutcome::Rejected(data) => Err(BindingError::from_revert(&data)),
        SendOutcome::Included(receipt) if !receipt.success => {
            Err(BindingError::from_revert(&Bytes::new()))
        }
        SendOutcome::Included(receipt) => Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.success,
            events: decode_events(contract, &receipt.logs),
        }),
    }
}
