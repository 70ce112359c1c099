//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI never awaits. It pushes [`RuntimeCommand`]s into a channel and
//! drains [`RuntimeEvent`]s on every frame; one worker thread owns the Tokio
//! runtime and the typed contract.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::Context;

use crate::domain::contract::Balance;
use crate::infrastructure::contract::TxOutcome;
use crate::infrastructure::ethereum::{ContractAddresses, ProviderConfig};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Query the greeting, then the lock state
    FetchGreeting,
    /// Query the lock state only
    CheckLockState,
    /// Query contract and caller balances
    FetchBalance,
    /// Send `setMessage`
    SetMessage { message: String, value: Balance },
    /// Send `unlock`
    Unlock { value: Balance },
    /// Switch to a different endpoint
    SwitchEndpoint { index: usize },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Connected and bound to the greeter deployment
    Connected {
        index: usize,
        endpoint: String,
        node_kind: String,
        contract: Address,
        caller: Option<Address>,
    },
    /// Greeting and lock state read successfully
    GreetingLoaded { greeting: String, locked: bool },
    /// Lock state re-checked after a transaction
    LockState { locked: bool },
    /// A read failed; the displayed greeting is stale
    FetchFailed { message: String },
    TxSucceeded {
        method: &'static str,
        outcome: TxOutcome,
    },
    TxFailed {
        method: &'static str,
        message: String,
    },
    BalanceReady {
        contract: Balance,
        caller: Option<U256>,
    },
    /// Error occurred
    Error { message: String },
}

/// Everything the worker needs to connect and call the contract
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub endpoints: Vec<ProviderConfig>,
    /// Greeter addresses, resolved per endpoint on connect
    pub contract: ContractAddresses,
    pub signer: Option<PrivateKeySigner>,
    pub gas_limit: Option<u64>,
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(settings: WorkerSettings) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("greeter-runtime".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(2)
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Failed to create Tokio runtime: {err}"),
                        });
                        return;
                    }
                };
                runtime.block_on(async {
                    if let Err(err) = run_async_worker(settings, cmd_rx, evt_tx.clone()).await {
                        tracing::error!(error = %format!("{err:#}"), "Worker exited");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("Failed to spawn runtime thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        match self.evt_rx.recv_timeout(timeout) {
            Ok(evt) => Some(evt),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
