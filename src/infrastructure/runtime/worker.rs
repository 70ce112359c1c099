//! Async worker - runs in Tokio runtime and drives the typed contract

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};

use crate::domain::contract::{Balance, BindingError, GasLimit, GasLimitAndRequiredValue};
use crate::infrastructure::contract::Greeter;
use crate::infrastructure::ethereum::{create_executor, DevChain, ProviderConfig, DEV_CONTRACT};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent, WorkerSettings};

const IDLE_POLL: Duration = Duration::from_millis(25);
const RECONNECT_DELAY: Duration = Duration::from_millis(900);

/// A live binding to one endpoint
#[derive(Debug, Clone)]
pub struct Connection {
    pub greeter: Greeter,
    pub endpoint: String,
    pub node_kind: String,
}

/// Connect to `config` and bind the greeter deployment. The dev endpoint
/// runs on `dev_chain`.
pub async fn connect_greeter(
    config: &ProviderConfig,
    contract: Option<alloy::primitives::Address>,
    signer: Option<PrivateKeySigner>,
    dev_chain: &DevChain,
) -> Result<Connection> {
    let address = match contract {
        Some(address) => address,
        None if config.is_dev() => DEV_CONTRACT,
        None => anyhow::bail!("No greeter address configured (use --contract or `contract` in config)"),
    };

    let executor = create_executor(config.clone(), signer, dev_chain).await?;
    let client_version = executor
        .client_version()
        .await
        .context("Failed to get client version")?;

    Ok(Connection {
        endpoint: executor.endpoint_name(),
        node_kind: detect_node_kind(&client_version),
        greeter: Greeter::new(address, executor),
    })
}

/// Run the async worker loop
pub async fn run_async_worker(
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if settings.endpoints.is_empty() {
        anyhow::bail!("No endpoints configured");
    }

    let mut endpoint_index = 0usize;
    let mut connection: Option<Connection> = None;
    // outlives reconnects so dev state survives endpoint switches
    let dev_chain = DevChain::new();

    loop {
        if connection.is_none() {
            let config = &settings.endpoints[endpoint_index];
            let contract = settings.contract.for_endpoint(config);
            match connect_greeter(config, contract, settings.signer.clone(), &dev_chain).await {
                Ok(conn) => {
                    tracing::info!(
                        endpoint = %conn.endpoint,
                        node = %conn.node_kind,
                        contract = %conn.greeter.address(),
                        caller = ?conn.greeter.caller(),
                        "Connected"
                    );
                    let _ = evt_tx.send(RuntimeEvent::Connected {
                        index: endpoint_index,
                        endpoint: conn.endpoint.clone(),
                        node_kind: conn.node_kind.clone(),
                        contract: conn.greeter.address(),
                        caller: conn.greeter.caller(),
                    });
                    connection = Some(conn);
                }
                Err(err) => {
                    tracing::warn!(endpoint = %config.display(), error = %format!("{err:#}"), "Connection failed");
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Connection failed ({}): {:#}", config.display(), err),
                    });

                    if settings.endpoints.len() > 1 {
                        endpoint_index = (endpoint_index + 1) % settings.endpoints.len();
                    }

                    // Commands queued while offline are answered with the same failure
                    loop {
                        match cmd_rx.try_recv() {
                            Ok(RuntimeCommand::Shutdown) | Err(TryRecvError::Disconnected) => {
                                return Ok(())
                            }
                            Ok(RuntimeCommand::SwitchEndpoint { index }) => {
                                if index < settings.endpoints.len() {
                                    endpoint_index = index;
                                }
                            }
                            Ok(cmd) => reject_offline(&cmd, &evt_tx),
                            Err(TryRecvError::Empty) => break,
                        }
                    }
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            }
        }

        let cmd = match cmd_rx.try_recv() {
            Ok(cmd) => cmd,
            Err(TryRecvError::Empty) => {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            }
            Err(TryRecvError::Disconnected) => return Ok(()),
        };

        match cmd {
            RuntimeCommand::Shutdown => return Ok(()),
            RuntimeCommand::SwitchEndpoint { index } => {
                if index >= settings.endpoints.len() {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!(
                            "Invalid endpoint index {} ({} total)",
                            index,
                            settings.endpoints.len()
                        ),
                    });
                    continue;
                }
                endpoint_index = index;
                connection = None;
            }
            cmd => {
                if let Some(conn) = connection.as_ref() {
                    let event = execute(&conn.greeter, settings.gas_limit, cmd).await;
                    let _ = evt_tx.send(event);
                }
            }
        }
    }
}

fn reject_offline(cmd: &RuntimeCommand, evt_tx: &Sender<RuntimeEvent>) {
    let message = "Not connected".to_string();
    let event = match cmd {
        RuntimeCommand::FetchGreeting | RuntimeCommand::CheckLockState => {
            RuntimeEvent::FetchFailed { message }
        }
        RuntimeCommand::SetMessage { .. } => RuntimeEvent::TxFailed {
            method: "setMessage",
            message,
        },
        RuntimeCommand::Unlock { .. } => RuntimeEvent::TxFailed {
            method: "unlock",
            message,
        },
        _ => RuntimeEvent::Error { message },
    };
    let _ = evt_tx.send(event);
}

/// Run one contract command and describe the result
async fn execute(greeter: &Greeter, gas_limit: Option<u64>, cmd: RuntimeCommand) -> RuntimeEvent {
    let read = GasLimit::new(gas_limit);
    match cmd {
        RuntimeCommand::FetchGreeting => match fetch_greeting(greeter, read).await {
            Ok((greeting, locked)) => RuntimeEvent::GreetingLoaded { greeting, locked },
            Err(err) => {
                tracing::error!(error = %err, "Error while fetching greeting");
                RuntimeEvent::FetchFailed {
                    message: err.to_string(),
                }
            }
        },
        RuntimeCommand::CheckLockState => {
            match greeter
                .query()
                .get_lock_state(read)
                .await
                .and_then(|ret| ret.into_value())
            {
                Ok(locked) => RuntimeEvent::LockState { locked },
                Err(err) => {
                    tracing::error!(error = %err, "Error while checking lock state");
                    RuntimeEvent::FetchFailed {
                        message: err.to_string(),
                    }
                }
            }
        }
        RuntimeCommand::FetchBalance => match fetch_balances(greeter, read).await {
            Ok((contract, caller)) => RuntimeEvent::BalanceReady { contract, caller },
            Err(err) => RuntimeEvent::Error {
                message: format!("Balance fetch failed: {err}"),
            },
        },
        RuntimeCommand::SetMessage { message, value } => {
            let options = GasLimitAndRequiredValue::new(gas_limit, U256::from(value));
            tx_event(
                "setMessage",
                greeter.tx().set_message(message, value, options).await,
            )
        }
        RuntimeCommand::Unlock { value } => {
            let options = GasLimitAndRequiredValue::new(gas_limit, U256::from(value));
            tx_event("unlock", greeter.tx().unlock(value, options).await)
        }
        RuntimeCommand::SwitchEndpoint { .. } | RuntimeCommand::Shutdown => RuntimeEvent::Error {
            message: "Control command reached the contract dispatcher".to_string(),
        },
    }
}

async fn fetch_greeting(greeter: &Greeter, options: GasLimit) -> Result<(String, bool), BindingError> {
    let greeting = greeter.query().greet(options).await?.into_value()?;
    let locked = greeter.query().get_lock_state(options).await?.into_value()?;
    Ok((greeting, locked))
}

async fn fetch_balances(
    greeter: &Greeter,
    options: GasLimit,
) -> Result<(Balance, Option<U256>), BindingError> {
    let contract = greeter.query().get_balance(options).await?.into_value()?;
    let caller = match greeter.caller() {
        Some(address) => Some(
            greeter
                .executor()
                .native_balance(address)
                .await
                .map_err(BindingError::transport)?,
        ),
        None => None,
    };
    Ok((contract, caller))
}

fn tx_event(
    method: &'static str,
    result: Result<crate::infrastructure::contract::TxOutcome, BindingError>,
) -> RuntimeEvent {
    match result {
        Ok(outcome) => {
            tracing::info!(
                method,
                tx = %outcome.tx_hash,
                block = ?outcome.block_number,
                gas_used = outcome.gas_used,
                events = outcome.events.len(),
                "Transaction included"
            );
            RuntimeEvent::TxSucceeded { method, outcome }
        }
        Err(err) => {
            tracing::error!(method, error = %err, "Transaction failed");
            RuntimeEvent::TxFailed {
                method,
                message: err.to_string(),
            }
        }
    }
}

/// Detect node kind from client version string
fn detect_node_kind(version: &str) -> String {
    let lower = version.to_lowercase();
    if lower.contains("anvil") {
        "anvil".to_string()
    } else if lower.contains("greeter-devchain") {
        "devchain".to_string()
    } else if lower.contains("reth") {
        "reth".to_string()
    } else if lower.contains("geth") || lower.contains("go-ethereum") {
        "geth".to_string()
    } else {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_detect_node_kind() {
        assert_eq!(detect_node_kind("anvil/v0.2.0"), "anvil");
        assert_eq!(detect_node_kind("Geth/v1.13.0"), "geth");
        assert_eq!(detect_node_kind("greeter-devchain/0.1.0"), "devchain");
        assert_eq!(detect_node_kind("erigon/2.0"), "erigon/2.0");
    }

    #[tokio::test]
    async fn test_fetch_greeting_reads_both_values() {
        let greeter = Greeter::new(DEV_CONTRACT, Arc::new(DevChain::new()));
        let event = execute(&greeter, None, RuntimeCommand::FetchGreeting).await;
        assert!(matches!(
            event,
            RuntimeEvent::GreetingLoaded { ref greeting, locked: false } if greeting == "Hello ink!"
        ));
    }

    #[tokio::test]
    async fn test_underpaid_unlock_reports_failure() {
        let greeter = Greeter::new(DEV_CONTRACT, Arc::new(DevChain::new()));
        let event = execute(&greeter, None, RuntimeCommand::Unlock { value: 10 }).await;
        assert!(matches!(event, RuntimeEvent::TxFailed { method: "unlock", .. }));
    }

    #[tokio::test]
    async fn test_connect_requires_address_off_dev() {
        let err = connect_greeter(
            &ProviderConfig::Http("http://127.0.0.1:1".into()),
            None,
            None,
            &DevChain::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("No greeter address"));
    }
}
