//! Tracing subscriber setup

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Headless commands log to stderr
    Stderr,
    /// The TUI owns the terminal, so logs go to a file
    File(PathBuf),
}

/// Directive applied when the user passes a bare level like "debug"
fn filter_spec(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!(
            "{},hyper=info,hyper_util=info,reqwest=info,tokio_tungstenite=info,alloy_transport_http=info,alloy_rpc_client=info",
            normalized
        )
    }
}

pub fn setup_logging(log_level: &str, sink: LogSink) -> Result<()> {
    let spec = filter_spec(log_level);
    let filter = EnvFilter::from_str(&spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    match &sink {
        LogSink::Stderr => {
            let layer = fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact();
            subscriber
                .with(layer)
                .try_init()
                .context("Logging already initialized")?;
        }
        LogSink::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .compact();
            subscriber
                .with(layer)
                .try_init()
                .context("Logging already initialized")?;
        }
    }

    tracing::info!(filter = %spec, sink = ?sink, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_gets_noisy_defaults() {
        let spec = filter_spec("debug");
        assert!(spec.starts_with("debug,"));
        assert!(spec.contains("hyper=info"));
    }

    #[test]
    fn test_custom_directives_pass_through() {
        assert_eq!(filter_spec("greeter=trace,warn"), "greeter=trace,warn");
    }
}
