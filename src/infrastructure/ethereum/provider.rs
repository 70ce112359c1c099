//! Contract executor abstraction and the Alloy JSON-RPC implementation
//!
//! `ContractExecutor` is the seam between the typed bindings and whatever
//! actually runs a call: a node reached over HTTP/WS/IPC, or the in-process
//! dev chain.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, Log, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportError;
use anyhow::{bail, Context, Result};

use crate::domain::contract::ContractCall;
use crate::infrastructure::ethereum::{DevChain, DEV_CONTRACT};

/// Provider configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
    /// In-process dev chain running the greeter contract
    Dev,
}

impl ProviderConfig {
    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
            ProviderConfig::Dev => "dev".to_string(),
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, ProviderConfig::Dev)
    }
}

/// Greeter addresses known before connecting
///
/// The dev chain has its own deployment; only an address given on the
/// command line overrides it there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    pub cli: Option<Address>,
    pub config: Option<Address>,
}

impl ContractAddresses {
    pub fn for_endpoint(&self, provider: &ProviderConfig) -> Option<Address> {
        if provider.is_dev() {
            Some(self.cli.unwrap_or(DEV_CONTRACT))
        } else {
            self.cli.or(self.config)
        }
    }
}

/// Raw outcome of a read-only call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    /// The call returned normally with these bytes
    Success(Bytes),
    /// The call reverted with this payload (possibly empty)
    Revert(Bytes),
}

/// Receipt data the bindings care about
#[derive(Debug, Clone)]
pub struct ExecutorReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Raw outcome of a sign-and-send
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// The transaction made it into a block
    Included(ExecutorReceipt),
    /// The pre-flight dry run reverted, nothing was submitted
    Rejected(Bytes),
}

/// Abstract contract executor
///
/// Encoding and decoding stay in the bindings; an executor only moves
/// calldata to a chain and raw bytes back.
#[async_trait::async_trait]
pub trait ContractExecutor: Send + Sync + 'static {
    /// Execute a read-only call against `contract`
    async fn query(&self, contract: Address, call: &ContractCall) -> Result<CallOutput>;

    /// Sign a transaction for `contract` with the configured signer and wait for inclusion
    async fn sign_and_send(&self, contract: Address, call: &ContractCall) -> Result<SendOutcome>;

    /// Native balance of an account
    async fn native_balance(&self, address: Address) -> Result<U256>;

    /// Client version (for node detection)
    async fn client_version(&self) -> Result<String>;

    /// Address of the configured signer; `None` means no wallet is connected
    fn caller(&self) -> Option<Address>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

/// Executor backed by an Alloy provider
pub struct AlloyExecutor {
    provider: DynProvider,
    signer: Option<Address>,
    endpoint: String,
}

// Builds the same provider stack with or without a wallet filler.
macro_rules! connect_with {
    ($builder:expr, $config:expr) => {
        match $config {
            ProviderConfig::Http(url) => {
                let rpc_url = url.parse().context("Invalid HTTP URL")?;
                $builder.connect_http(rpc_url).erased()
            }
            ProviderConfig::WebSocket(url) => $builder
                .connect(url)
                .await
                .context("Failed to create WebSocket provider")?
                .erased(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => {
                use alloy::providers::IpcConnect;
                let ipc = IpcConnect::new(path.to_string_lossy().to_string());
                $builder
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?
                    .erased()
            }
            ProviderConfig::Dev => bail!("dev endpoint has no JSON-RPC transport"),
        }
    };
}

impl AlloyExecutor {
    pub async fn connect(config: &ProviderConfig, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let signer_address = signer.as_ref().map(|s| s.address());
        let provider = match signer {
            Some(signer) => {
                connect_with!(ProviderBuilder::new().wallet(EthereumWallet::from(signer)), config)
            }
            None => connect_with!(ProviderBuilder::new(), config),
        };
        Ok(Self {
            provider,
            signer: signer_address,
            endpoint: config.display(),
        })
    }

    fn request(&self, contract: Address, call: &ContractCall) -> TransactionRequest {
        build_request(contract, self.signer, call)
    }
}

/// Wrap an encoded call in an unsigned transaction request
pub fn build_request(
    contract: Address,
    from: Option<Address>,
    call: &ContractCall,
) -> TransactionRequest {
    let mut request = TransactionRequest::default()
        .with_to(contract)
        .with_input(call.calldata.clone());
    if let Some(from) = from {
        request = request.with_from(from);
    }
    if let Some(gas) = call.gas_limit {
        request = request.with_gas_limit(gas);
    }
    if !call.value.is_zero() {
        request = request.with_value(call.value);
    }
    request
}

/// Pull revert data out of a JSON-RPC error response, if the node sent any.
fn revert_data(err: &TransportError) -> Option<Bytes> {
    let payload = err.as_error_resp()?;
    if let Some(data) = payload.as_revert_data() {
        return Some(data);
    }
    payload
        .message
        .to_lowercase()
        .contains("revert")
        .then(Bytes::new)
}

#[async_trait::async_trait]
impl ContractExecutor for AlloyExecutor {
    async fn query(&self, contract: Address, call: &ContractCall) -> Result<CallOutput> {
        let request = self.request(contract, call);
        match self.provider.call(request).await {
            Ok(output) => Ok(CallOutput::Success(output)),
            Err(err) => match revert_data(&err) {
                Some(data) => Ok(CallOutput::Revert(data)),
                None => Err(err).with_context(|| format!("eth_call {} failed", call.method)),
            },
        }
    }

    async fn sign_and_send(&self, contract: Address, call: &ContractCall) -> Result<SendOutcome> {
        if self.signer.is_none() {
            bail!("no signer configured for {}", self.endpoint);
        }

        // Dry run first so contract errors come back decoded instead of as a bare failed receipt
        if let CallOutput::Revert(data) = self.query(contract, call).await? {
            return Ok(SendOutcome::Rejected(data));
        }

        let request = self.request(contract, call);
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .with_context(|| format!("Failed to submit {}", call.method))?;
        let receipt = pending
            .get_receipt()
            .await
            .with_context(|| format!("Failed to fetch receipt for {}", call.method))?;

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect();

        Ok(SendOutcome::Included(ExecutorReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
            logs,
        }))
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    async fn client_version(&self) -> Result<String> {
        Ok(self.provider.get_client_version().await?)
    }

    fn caller(&self) -> Option<Address> {
        self.signer
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}

/// Create an executor from configuration. The dev endpoint shares
/// `dev_chain`'s state.
pub async fn create_executor(
    config: ProviderConfig,
    signer: Option<PrivateKeySigner>,
    dev_chain: &DevChain,
) -> Result<Arc<dyn ContractExecutor>> {
    if config.is_dev() {
        return Ok(Arc::new(dev_chain.clone()));
    }
    Ok(Arc::new(AlloyExecutor::connect(&config, signer).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ProviderConfig::Http("http://localhost:8545".into()).display(),
            "http://localhost:8545"
        );
        assert_eq!(ProviderConfig::Dev.display(), "dev");
        assert!(ProviderConfig::Dev.is_dev());
    }

    #[test]
    fn test_dev_endpoint_ignores_config_address() {
        let configured = Address::with_last_byte(0x11);
        let http = ProviderConfig::Http("http://localhost:8545".into());

        let addresses = ContractAddresses {
            cli: None,
            config: Some(configured),
        };
        assert_eq!(addresses.for_endpoint(&ProviderConfig::Dev), Some(DEV_CONTRACT));
        assert_eq!(addresses.for_endpoint(&http), Some(configured));

        let addresses = ContractAddresses {
            cli: Some(Address::with_last_byte(0x22)),
            config: Some(configured),
        };
        assert_eq!(
            addresses.for_endpoint(&ProviderConfig::Dev),
            Some(Address::with_last_byte(0x22))
        );
        assert_eq!(addresses.for_endpoint(&http), Some(Address::with_last_byte(0x22)));
        assert_eq!(ContractAddresses::default().for_endpoint(&http), None);
    }

    #[tokio::test]
    async fn test_dev_executors_share_chain_state() {
        use crate::domain::contract::{GasLimit, GasLimitAndRequiredValue};
        use crate::infrastructure::contract::Greeter;

        let chain = DevChain::new();
        let first = create_executor(ProviderConfig::Dev, None, &chain).await.unwrap();
        Greeter::new(DEV_CONTRACT, first)
            .tx()
            .set_message("kept", 100, GasLimitAndRequiredValue::new(None, U256::from(100u64)))
            .await
            .unwrap();

        // a reconnect hands out a new executor over the same chain
        let second = create_executor(ProviderConfig::Dev, None, &chain).await.unwrap();
        let greeting = Greeter::new(DEV_CONTRACT, second)
            .query()
            .greet(GasLimit::default())
            .await
            .unwrap();
        assert_eq!(greeting.into_value().unwrap(), "kept");
        assert_eq!(chain.block_number().unwrap(), 1);
    }
}
