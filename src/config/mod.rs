use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::contract::Balance;
use crate::infrastructure::ethereum::{ContractAddresses, ProviderConfig};

/// Value attached to `setMessage` by the form
pub const DEFAULT_MESSAGE_VALUE: u64 = 100;
/// Value attached to `unlock` by the form
pub const DEFAULT_UNLOCK_VALUE: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    /// Deployed greeter address
    #[serde(default)]
    pub contract: Option<String>,

    #[serde(default)]
    pub gas_limit: Option<u64>,

    #[serde(default = "default_message_value")]
    pub message_value: u64,

    #[serde(default = "default_unlock_value")]
    pub unlock_value: u64,
}

fn default_message_value() -> u64 {
    DEFAULT_MESSAGE_VALUE
}

fn default_unlock_value() -> u64 {
    DEFAULT_UNLOCK_VALUE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            contract: None,
            gas_limit: None,
            message_value: DEFAULT_MESSAGE_VALUE,
            unlock_value: DEFAULT_UNLOCK_VALUE,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    pub fn message_value(&self) -> Balance {
        Balance::from(self.message_value)
    }

    pub fn unlock_value(&self) -> Balance {
        Balance::from(self.unlock_value)
    }
}

/// Load the config file. Missing or invalid files fall back to defaults.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match Config::parse(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "Ignoring config");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("GREETER_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("greeter").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("greeter").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "greeter", "greeter")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("greeter"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("greeter"));
    }
    directories::ProjectDirs::from("io", "greeter", "greeter")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("greeter.log"))
}

/// Endpoint flags given on the command line
#[derive(Debug, Clone, Default)]
pub struct EndpointOverrides {
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<PathBuf>,
    pub dev: bool,
}

/// One selectable endpoint
#[derive(Debug, Clone)]
pub struct EndpointOption {
    pub label: String,
    pub provider: ProviderConfig,
}

/// Build the endpoint list: CLI flags first, then the config file, then a
/// local node as fallback. Duplicates are dropped.
pub fn resolve_endpoints(
    overrides: &EndpointOverrides,
    config: &Config,
) -> Result<Vec<EndpointOption>> {
    fn push(
        out: &mut Vec<EndpointOption>,
        seen: &mut BTreeSet<String>,
        provider: ProviderConfig,
        name: Option<String>,
    ) {
        let display = provider.display();
        if !seen.insert(display.to_lowercase()) {
            return;
        }
        let label = name
            .filter(|value| !value.trim().is_empty())
            .map(|name| format!("{name} ({display})"))
            .unwrap_or(display);
        out.push(EndpointOption { label, provider });
    }

    let mut endpoints = Vec::new();
    let mut seen = BTreeSet::new();

    if overrides.dev {
        push(&mut endpoints, &mut seen, ProviderConfig::Dev, None);
    }

    if let Some(ipc) = overrides.ipc.clone() {
        #[cfg(unix)]
        {
            push(
                &mut endpoints,
                &mut seen,
                ProviderConfig::Ipc(ipc),
                Some("cli".to_string()),
            );
        }
        #[cfg(not(unix))]
        {
            let _ = ipc;
            anyhow::bail!("IPC is not supported on this platform");
        }
    } else if let Some(ws) = non_empty(overrides.ws.as_deref()) {
        push(
            &mut endpoints,
            &mut seen,
            ProviderConfig::WebSocket(ws.to_string()),
            Some("cli".to_string()),
        );
    } else if let Some(rpc) = non_empty(overrides.rpc.as_deref()) {
        push(
            &mut endpoints,
            &mut seen,
            ProviderConfig::Http(normalize_http_endpoint(rpc)),
            Some("cli".to_string()),
        );
    }

    for (idx, entry) in config.endpoints.iter().enumerate() {
        let name = entry.name.clone();
        if let Some(rpc) = non_empty(entry.rpc.as_deref()) {
            let provider = if rpc.starts_with("ws://") || rpc.starts_with("wss://") {
                ProviderConfig::WebSocket(rpc.to_string())
            } else {
                ProviderConfig::Http(normalize_http_endpoint(rpc))
            };
            push(&mut endpoints, &mut seen, provider, name);
            continue;
        }
        if let Some(ipc) = non_empty(entry.ipc.as_deref()) {
            #[cfg(unix)]
            {
                if let Some(path) = expand_path(ipc) {
                    push(
                        &mut endpoints,
                        &mut seen,
                        ProviderConfig::Ipc(path),
                        name.or_else(|| Some(format!("ipc-{idx}"))),
                    );
                }
            }
            #[cfg(not(unix))]
            {
                let _ = (idx, ipc, name);
            }
        }
    }

    if endpoints.is_empty() {
        push(
            &mut endpoints,
            &mut seen,
            ProviderConfig::Http(normalize_http_endpoint("localhost:8545")),
            Some("local".to_string()),
        );
    }

    Ok(endpoints)
}

/// Greeter addresses given on the command line and in the config file
pub fn contract_addresses(cli: Option<&str>, config: &Config) -> Result<ContractAddresses> {
    Ok(ContractAddresses {
        cli: parse_address(cli)?,
        config: parse_address(config.contract.as_deref())?,
    })
}

/// Pick the greeter address for `provider`. The dev chain keeps its own
/// deployment unless `--contract` names another.
pub fn resolve_contract(
    cli: Option<&str>,
    config: &Config,
    provider: &ProviderConfig,
) -> Result<Option<Address>> {
    Ok(contract_addresses(cli, config)?.for_endpoint(provider))
}

fn parse_address(raw: Option<&str>) -> Result<Option<Address>> {
    non_empty(raw)
        .map(|raw| {
            raw.parse::<Address>()
                .with_context(|| format!("Invalid contract address: {raw}"))
        })
        .transpose()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(unix)]
fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ethereum::DEV_CONTRACT;

    #[test]
    fn test_parse_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.endpoints.is_empty());
        assert_eq!(config.message_value(), 100);
        assert_eq!(config.unlock_value(), 1000);
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
contract = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
gas_limit = 200000
message_value = 150

[[endpoints]]
name = "anvil"
rpc = "127.0.0.1:8545"
"#,
        )
        .unwrap();
        assert_eq!(config.gas_limit, Some(200_000));
        assert_eq!(config.message_value(), 150);
        assert_eq!(config.unlock_value(), 1000);
        assert_eq!(config.endpoints.len(), 1);
    }

    #[test]
    fn test_cli_endpoint_comes_first_and_dedupes() {
        let config = Config::parse(
            r#"
[[endpoints]]
name = "same"
rpc = "http://localhost:8545"

[[endpoints]]
rpc = "ws://node:8546"
"#,
        )
        .unwrap();
        let overrides = EndpointOverrides {
            rpc: Some("localhost:8545".to_string()),
            ..Default::default()
        };
        let endpoints = resolve_endpoints(&overrides, &config).unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].label, "cli (http://localhost:8545)");
        assert!(matches!(endpoints[1].provider, ProviderConfig::WebSocket(_)));
    }

    #[test]
    fn test_fallback_to_local_node() {
        let endpoints =
            resolve_endpoints(&EndpointOverrides::default(), &Config::default()).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].provider.display(), "http://localhost:8545");
    }

    #[test]
    fn test_dev_contract_defaults() {
        let config = Config::default();
        assert_eq!(
            resolve_contract(None, &config, &ProviderConfig::Dev).unwrap(),
            Some(DEV_CONTRACT)
        );
        assert_eq!(
            resolve_contract(None, &config, &ProviderConfig::Http("http://x".into())).unwrap(),
            None
        );
        assert!(resolve_contract(Some("nope"), &config, &ProviderConfig::Dev).is_err());
    }

    #[test]
    fn test_dev_flag_wins_over_config_contract() {
        let config = Config {
            contract: Some("0x1111111111111111111111111111111111111111".to_string()),
            ..Default::default()
        };
        let configured = Address::repeat_byte(0x11);
        let http = ProviderConfig::Http("http://localhost:8545".into());

        assert_eq!(
            resolve_contract(None, &config, &ProviderConfig::Dev).unwrap(),
            Some(DEV_CONTRACT)
        );
        assert_eq!(resolve_contract(None, &config, &http).unwrap(), Some(configured));

        // --contract still applies everywhere
        let cli = "0x0000000000000000000000000000000000000002";
        assert_eq!(
            resolve_contract(Some(cli), &config, &ProviderConfig::Dev).unwrap(),
            Some(Address::with_last_byte(2))
        );
        assert_eq!(
            contract_addresses(Some(cli), &config).unwrap(),
            ContractAddresses {
                cli: Some(Address::with_last_byte(2)),
                config: Some(configured),
            }
        );
    }
}
