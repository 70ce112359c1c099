//! Event decoding for greeter logs

use alloy_primitives::{Address, Log};
use alloy_sol_types::SolEventInterface;
use serde::Serialize;

use super::abi::IGreeter;

/// A decoded greeter event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GreeterEvent {
    Greeted {
        from: Option<Address>,
        message: String,
    },
    Locked {
        message: String,
    },
}

impl GreeterEvent {
    /// Decode a single log. Returns `None` for logs this contract did not declare.
    pub fn decode(log: &Log) -> Option<Self> {
        let event =
            IGreeter::IGreeterEvents::decode_raw_log(log.data.topics(), &log.data.data).ok()?;
        Some(match event {
            IGreeter::IGreeterEvents::Greeted(greeted) => Self::Greeted {
                from: (greeted.from != Address::ZERO).then_some(greeted.from),
                message: greeted.message,
            },
            IGreeter::IGreeterEvents::Locked(locked) => Self::Locked {
                message: locked.message,
            },
        })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Greeted { message, .. } | Self::Locked { message } => message,
        }
    }
}

/// Decode every log emitted by `contract`, skipping foreign or unknown ones.
pub fn decode_events(contract: Address, logs: &[Log]) -> Vec<GreeterEvent> {
    logs.iter()
        .filter(|log| log.address == contract)
        .filter_map(GreeterEvent::decode)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::SolEvent;

    const CONTRACT: Address = address!("00000000000000000000000000000000000000aa");

    fn locked_log(emitter: Address, message: &str) -> Log {
        let data = IGreeter::Locked {
            message: message.to_string(),
        }
        .encode_log_data();
        Log {
            address: emitter,
            data,
        }
    }

    #[test]
    fn test_decode_locked() {
        let log = locked_log(CONTRACT, "Contract is Locked!");
        assert_eq!(
            GreeterEvent::decode(&log),
            Some(GreeterEvent::Locked {
                message: "Contract is Locked!".to_string()
            })
        );
    }

    #[test]
    fn test_zero_sender_maps_to_none() {
        let data = IGreeter::Greeted {
            from: Address::ZERO,
            message: "gm".to_string(),
        }
        .encode_log_data();
        let log = Log {
            address: CONTRACT,
            data,
        };
        assert_eq!(
            GreeterEvent::decode(&log),
            Some(GreeterEvent::Greeted {
                from: None,
                message: "gm".to_string()
            })
        );
    }

    #[test]
    fn test_foreign_logs_are_skipped() {
        let other = address!("00000000000000000000000000000000000000bb");
        let logs = vec![locked_log(other, "nope"), locked_log(CONTRACT, "yes")];
        let events = decode_events(CONTRACT, &logs);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message(), "yes");
    }
}
