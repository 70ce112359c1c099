//! Shared context passed to modules

use alloy::primitives::Address;

/// Shared context available to all modules
#[derive(Debug, Default)]
pub struct Context {
    /// Greeter deployment, once connected
    pub contract: Option<Address>,

    /// Connected signer, if any
    pub caller: Option<Address>,

    /// Current endpoint display string
    pub endpoint: String,

    /// A greeting fetch is in flight
    pub loading: bool,

    /// A transaction is in flight
    pub submitting: bool,

    /// Last text copied
    pub clipboard: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet_connected(&self) -> bool {
        self.caller.is_some()
    }

    /// Buttons are disabled while anything is in flight
    pub fn busy(&self) -> bool {
        self.loading || self.submitting
    }

    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }
}
