//! In-process dev chain running the greeter contract
//!
//! Executes greeter calldata against in-memory state so the console can be
//! exercised without a node. A failed call rolls back state and events,
//! matching how a reverted transaction behaves on chain.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{address, keccak256, Address, Bytes, Log, LogData, B256, U256};
use alloy_sol_types::{SolEvent, SolInterface, SolValue};
use anyhow::{anyhow, bail, Result};

use crate::domain::contract::{ContractCall, GreeterError, IGreeter};
use crate::infrastructure::ethereum::provider::{
    CallOutput, ContractExecutor, ExecutorReceipt, SendOutcome,
};

/// Address the greeter is "deployed" at on the dev chain
pub const DEV_CONTRACT: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

/// First funded dev account, used as the default signer
pub const DEV_ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// Initial balance for every funded account (10_000 units of 1e18)
const DEV_FUNDING: u128 = 10_000 * 1_000_000_000_000_000_000;

const FLAT_GAS: u64 = 21_000;

/// Greeter contract storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreeterState {
    pub message: String,
    pub locked: bool,
    pub count: i32,
}

impl GreeterState {
    pub fn new(message: impl Into<String>, locked: bool, count: i32) -> Self {
        Self {
            message: message.into(),
            locked,
            count,
        }
    }
}

impl Default for GreeterState {
    fn default() -> Self {
        Self::new("Hello ink!", false, 0)
    }
}

#[derive(Debug, Clone)]
struct ChainState {
    greeter: GreeterState,
    balances: BTreeMap<Address, U256>,
    block_number: u64,
    nonce: u64,
}

impl ChainState {
    fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), GreeterError> {
        let available = self.balance(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(GreeterError::TransferFailed)?;
        self.balances.insert(from, remaining);
        let credited = self.balance(to).saturating_add(amount);
        self.balances.insert(to, credited);
        Ok(())
    }
}

/// Effects of one successful execution
struct Execution {
    output: Bytes,
    logs: Vec<Log>,
}

/// Why an execution reverted
enum Revert {
    Contract(GreeterError),
    Undecodable,
}

impl Revert {
    fn data(&self) -> Bytes {
        match self {
            Revert::Contract(err) => err.to_revert(),
            Revert::Undecodable => Bytes::new(),
        }
    }
}

/// In-memory chain with one greeter deployment
#[derive(Clone)]
pub struct DevChain {
    contract: Address,
    signer: Option<Address>,
    state: Arc<Mutex<ChainState>>,
}

impl DevChain {
    /// Dev chain with the default greeter and a connected dev account
    pub fn new() -> Self {
        Self::with_state(GreeterState::default())
    }

    /// Dev chain whose greeter starts from `greeter`
    pub fn with_state(greeter: GreeterState) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(DEV_ACCOUNT, U256::from(DEV_FUNDING));
        Self {
            contract: DEV_CONTRACT,
            signer: Some(DEV_ACCOUNT),
            state: Arc::new(Mutex::new(ChainState {
                greeter,
                balances,
                block_number: 0,
                nonce: 0,
            })),
        }
    }

    /// Same chain, seen through a different (or no) signer
    pub fn with_signer(&self, signer: Option<Address>) -> Self {
        Self {
            contract: self.contract,
            signer,
            state: Arc::clone(&self.state),
        }
    }

    /// Snapshot of the greeter storage
    pub fn greeter_state(&self) -> Result<GreeterState> {
        Ok(self.lock()?.greeter.clone())
    }

    pub fn block_number(&self) -> Result<u64> {
        Ok(self.lock()?.block_number)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChainState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("dev chain state poisoned"))
    }

    /// Run `call` against `state` as `caller`. On revert `state` may be dirty;
    /// callers execute on a copy.
    fn execute(
        &self,
        state: &mut ChainState,
        caller: Address,
        call: &ContractCall,
    ) -> Result<Execution, Revert> {
        if !call.value.is_zero() {
            state
                .transfer(caller, self.contract, call.value)
                .map_err(|_| Revert::Contract(GreeterError::InsufficientBalance))?;
        }

        let decoded =
            IGreeter::IGreeterCalls::abi_decode(&call.calldata).map_err(|_| Revert::Undecodable)?;
        let mut logs = Vec::new();

        let output: Bytes = match decoded {
            IGreeter::IGreeterCalls::getBalance(_) => {
                let balance: u128 = state.balance(self.contract).saturating_to();
                (balance,).abi_encode_params().into()
            }
            IGreeter::IGreeterCalls::greet(_) => {
                (state.greeter.message.clone(),).abi_encode_params().into()
            }
            IGreeter::IGreeterCalls::getLockState(_) => {
                (state.greeter.locked,).abi_encode_params().into()
            }
            IGreeter::IGreeterCalls::setMessage(args) => {
                if args.value < 100 {
                    return Err(Revert::Contract(GreeterError::InsufficientBalance));
                }
                let greeter = &mut state.greeter;
                if greeter.locked {
                    logs.push(self.locked_log("Contract is Locked!"));
                } else if greeter.count > 1 && greeter.count % 5 == 0 {
                    greeter.count += 1;
                    greeter.message = "You won!".to_string();
                    greeter.locked = true;
                    let payout = state.balance(self.contract);
                    state
                        .transfer(self.contract, caller, payout)
                        .map_err(Revert::Contract)?;
                } else {
                    greeter.count += 1;
                    greeter.message = args.newMessage;
                }
                Bytes::new()
            }
            IGreeter::IGreeterCalls::unlock(args) => {
                if !state.greeter.locked {
                    logs.push(self.locked_log("Contract is Not Locked!"));
                }
                if args.value < 1000 {
                    return Err(Revert::Contract(GreeterError::InsufficientBalance));
                }
                state.greeter.locked = false;
                Bytes::new()
            }
        };

        Ok(Execution { output, logs })
    }

    fn locked_log(&self, message: &str) -> Log {
        let data: LogData = IGreeter::Locked {
            message: message.to_string(),
        }
        .encode_log_data();
        Log {
            address: self.contract,
            data,
        }
    }
}

impl Default for DevChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContractExecutor for DevChain {
    async fn query(&self, contract: Address, call: &ContractCall) -> Result<CallOutput> {
        if contract != self.contract {
            bail!("no contract deployed at {contract}");
        }
        let caller = self.signer.unwrap_or(Address::ZERO);
        let mut scratch = self.lock()?.clone();
        Ok(match self.execute(&mut scratch, caller, call) {
            Ok(execution) => CallOutput::Success(execution.output),
            Err(revert) => CallOutput::Revert(revert.data()),
        })
    }

    async fn sign_and_send(&self, contract: Address, call: &ContractCall) -> Result<SendOutcome> {
        let Some(caller) = self.signer else {
            bail!("no signer configured for dev chain");
        };
        if contract != self.contract {
            bail!("no contract deployed at {contract}");
        }

        let mut state = self.lock()?;
        let mut next = state.clone();
        let execution = match self.execute(&mut next, caller, call) {
            Ok(execution) => execution,
            Err(revert) => return Ok(SendOutcome::Rejected(revert.data())),
        };

        next.block_number += 1;
        next.nonce += 1;
        let tx_hash: B256 = keccak256(
            [
                caller.as_slice(),
                &next.nonce.to_be_bytes()[..],
                call.calldata.as_ref(),
            ]
            .concat(),
        );
        let receipt = ExecutorReceipt {
            tx_hash,
            block_number: Some(next.block_number),
            gas_used: call.gas_limit.map_or(FLAT_GAS, |limit| limit.min(FLAT_GAS)),
            success: true,
            logs: execution.logs,
        };
        *state = next;

        tracing::debug!(
            target: "devchain",
            method = call.method,
            block = receipt.block_number,
            tx = %receipt.tx_hash,
            "Included transaction"
        );
        Ok(SendOutcome::Included(receipt))
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        Ok(self.lock()?.balance(address))
    }

    async fn client_version(&self) -> Result<String> {
        Ok(format!("greeter-devchain/{}", env!("CARGO_PKG_VERSION")))
    }

    fn caller(&self) -> Option<Address> {
        self.signer
    }

    fn endpoint_name(&self) -> String {
        "dev".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::abi::SET_MESSAGE;
    use crate::domain::contract::GasLimitAndRequiredValue;

    fn set_message(message: &str, value: u128) -> ContractCall {
        ContractCall::encode(
            &SET_MESSAGE,
            &IGreeter::setMessageCall {
                newMessage: message.to_string(),
                value,
            },
        )
    }

    #[tokio::test]
    async fn test_default_state() {
        let chain = DevChain::new();
        let state = chain.greeter_state().unwrap();
        assert_eq!(state.message, "Hello ink!");
        assert!(!state.locked);
        assert_eq!(state.count, 0);
    }

    #[tokio::test]
    async fn test_revert_rolls_back_state() {
        let chain = DevChain::new();
        let outcome = chain
            .sign_and_send(DEV_CONTRACT, &set_message("too cheap", 99))
            .await
            .unwrap();
        assert!(matches!(outcome, SendOutcome::Rejected(_)));
        assert_eq!(chain.greeter_state().unwrap().message, "Hello ink!");
        assert_eq!(chain.block_number().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_does_not_commit() {
        let chain = DevChain::new();
        let output = chain
            .query(DEV_CONTRACT, &set_message("dry run", 100))
            .await
            .unwrap();
        assert_eq!(output, CallOutput::Success(Bytes::new()));
        assert_eq!(chain.greeter_state().unwrap().message, "Hello ink!");
    }

    #[tokio::test]
    async fn test_attached_value_is_credited() {
        let chain = DevChain::new();
        let call = set_message("paid", 100).with_options(
            &SET_MESSAGE,
            GasLimitAndRequiredValue::new(None, U256::from(100u64)),
        );
        chain.sign_and_send(DEV_CONTRACT, &call).await.unwrap();
        assert_eq!(
            chain.native_balance(DEV_CONTRACT).await.unwrap(),
            U256::from(100u64)
        );
    }

    #[tokio::test]
    async fn test_send_without_signer_fails() {
        let chain = DevChain::new().with_signer(None);
        assert!(chain
            .sign_and_send(DEV_CONTRACT, &set_message("hi", 100))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unknown_contract_is_an_error() {
        let chain = DevChain::new();
        assert!(chain
            .query(Address::ZERO, &set_message("hi", 100))
            .await
            .is_err());
    }
}
