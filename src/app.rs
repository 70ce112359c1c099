use std::time::{Duration, Instant};

use alloy::primitives::{Address, U256};
use crossterm::event::KeyEvent;

use crate::core::{parse_command, Action, Command, Context, Module, NotifyLevel};
use crate::domain::contract::{Balance, GreeterEvent, UpdateGreeting};
use crate::infrastructure::contract::TxOutcome;
use crate::infrastructure::runtime::{RuntimeCommand, RuntimeEvent};
use crate::modules::greeter::GreeterForm;

pub const FETCH_ERROR_TOAST: &str = "Error while fetching greeting. Try again…";
pub const WALLET_TOAST: &str = "Wallet not connected. Try again…";
pub const LOADING_LABEL: &str = "Loading…";

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Form,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Loading,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub since: Instant,
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

/// The last transaction that made it into a block
#[derive(Debug, Clone)]
pub struct LastTx {
    pub method: &'static str,
    pub outcome: TxOutcome,
}

#[derive(Debug)]
pub struct App {
    /// Shared context for modules
    pub ctx: Context,
    pub form: GreeterForm,
    pub input_mode: InputMode,
    pub command: CommandBar,
    /// Fetched greeting; `None` until loaded or after a failed fetch
    pub greeting: Option<String>,
    pub locked: Option<bool>,
    pub node_kind: String,
    pub endpoints: Vec<String>,
    pub endpoint_index: usize,
    pub contract_balance: Option<Balance>,
    pub caller_balance: Option<U256>,
    pub last_tx: Option<LastTx>,
    pub toast: Option<Toast>,
    pub help_open: bool,
    pub should_quit: bool,
    pub message_value: Balance,
    pub unlock_value: Balance,
    pending_commands: Vec<RuntimeCommand>,
    pending_copy: Option<String>,
}

impl App {
    pub fn new(message_value: Balance, unlock_value: Balance) -> Self {
        Self {
            ctx: Context::new(),
            form: GreeterForm::new(),
            input_mode: InputMode::Form,
            command: CommandBar::default(),
            greeting: None,
            locked: None,
            node_kind: "connecting".to_string(),
            endpoints: Vec::new(),
            endpoint_index: 0,
            contract_balance: None,
            caller_balance: None,
            last_tx: None,
            toast: None,
            help_open: false,
            should_quit: false,
            message_value,
            unlock_value,
            pending_commands: Vec::new(),
            pending_copy: None,
        }
    }

    pub fn set_toast(&mut self, text: impl Into<String>, level: ToastLevel) {
        self.toast = Some(Toast {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn toast_text(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.text.as_str(), toast.level))
    }

    pub fn on_tick(&mut self) {
        let Some(toast) = self.toast.as_ref() else {
            return;
        };
        // loading toasts stay up until the transaction settles
        if toast.level == ToastLevel::Loading && self.ctx.submitting {
            return;
        }
        if toast.since.elapsed() > TOAST_TTL {
            self.toast = None;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.ctx.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.ctx.submitting
    }

    /// Submit and unlock are disabled while anything is in flight
    pub fn buttons_enabled(&self) -> bool {
        !self.ctx.busy()
    }

    pub fn contract_address(&self) -> Option<Address> {
        self.ctx.contract
    }

    pub fn contract_label(&self) -> String {
        self.ctx
            .contract
            .map(|address| address.to_checksum(None))
            .unwrap_or_else(|| LOADING_LABEL.to_string())
    }

    pub fn greeting_label(&self) -> String {
        if self.ctx.loading || self.ctx.contract.is_none() {
            return LOADING_LABEL.to_string();
        }
        self.greeting.clone().unwrap_or_default()
    }

    pub fn lock_label(&self) -> String {
        if self.ctx.loading || self.ctx.contract.is_none() {
            return LOADING_LABEL.to_string();
        }
        self.locked.map(|locked| locked.to_string()).unwrap_or_default()
    }

    /// Queue a greeting + lock state read. No-op until connected or while a
    /// read is already in flight.
    pub fn request_fetch(&mut self) {
        if self.ctx.contract.is_none() || self.ctx.loading {
            return;
        }
        self.ctx.loading = true;
        self.pending_commands.push(RuntimeCommand::FetchGreeting);
    }

    /// Validate and send `setMessage`
    pub fn submit_message(&mut self, raw: &str) {
        if !self.buttons_enabled() {
            return;
        }
        let update = match UpdateGreeting::parse(raw) {
            Ok(update) => update,
            Err(err) => {
                self.set_toast(err.to_string(), ToastLevel::Warn);
                return;
            }
        };
        if !self.ctx.wallet_connected() || self.ctx.contract.is_none() {
            self.set_toast(WALLET_TOAST, ToastLevel::Error);
            return;
        }
        self.ctx.submitting = true;
        self.pending_commands.push(RuntimeCommand::SetMessage {
            message: update.new_message,
            value: self.message_value,
        });
        self.set_toast("Updating greeting…", ToastLevel::Loading);
    }

    pub fn unlock(&mut self) {
        if !self.buttons_enabled() {
            return;
        }
        if !self.ctx.wallet_connected() || self.ctx.contract.is_none() {
            self.set_toast(WALLET_TOAST, ToastLevel::Error);
            return;
        }
        self.ctx.submitting = true;
        self.pending_commands.push(RuntimeCommand::Unlock {
            value: self.unlock_value,
        });
        self.set_toast("Unlocking contract…", ToastLevel::Loading);
    }

    pub fn request_balance(&mut self) {
        if self.ctx.contract.is_none() {
            self.set_toast("Not connected", ToastLevel::Warn);
            return;
        }
        self.pending_commands.push(RuntimeCommand::FetchBalance);
        self.set_toast("Fetching balances…", ToastLevel::Info);
    }

    /// Switch to `index`, or to the next endpoint when `None`
    pub fn switch_endpoint(&mut self, index: Option<usize>) {
        if self.endpoints.is_empty() {
            self.set_toast("No endpoints configured", ToastLevel::Warn);
            return;
        }
        let len = self.endpoints.len();
        let next = index.unwrap_or((self.endpoint_index + 1) % len);
        if next >= len {
            self.set_toast(
                format!("No endpoint {} ({} configured)", next + 1, len),
                ToastLevel::Warn,
            );
            return;
        }
        self.endpoint_index = next;
        self.ctx.contract = None;
        self.ctx.caller = None;
        self.greeting = None;
        self.locked = None;
        self.pending_commands
            .push(RuntimeCommand::SwitchEndpoint { index: next });
        let label = self.endpoints[next].clone();
        self.set_toast(format!("Switching endpoint: {label}"), ToastLevel::Info);
    }

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Connected {
                index,
                endpoint,
                node_kind,
                contract,
                caller,
            } => {
                self.endpoint_index = index;
                self.ctx.endpoint = endpoint.clone();
                self.ctx.contract = Some(contract);
                self.ctx.caller = caller;
                self.node_kind = node_kind;
                self.contract_balance = None;
                self.caller_balance = None;
                self.set_toast(format!("Connected to {endpoint}"), ToastLevel::Info);
                // new contract reference: read it from scratch
                self.ctx.loading = false;
                self.request_fetch();
            }
            RuntimeEvent::GreetingLoaded { greeting, locked } => {
                self.greeting = Some(greeting);
                self.locked = Some(locked);
                self.ctx.loading = false;
            }
            RuntimeEvent::LockState { locked } => {
                self.locked = Some(locked);
            }
            RuntimeEvent::FetchFailed { message } => {
                tracing::error!(error = %message, "Fetch failed");
                self.greeting = None;
                self.ctx.loading = false;
                self.set_toast(FETCH_ERROR_TOAST, ToastLevel::Error);
            }
            RuntimeEvent::TxSucceeded { method, outcome } => {
                self.ctx.submitting = false;
                self.form.reset();
                let notice = outcome.events.iter().find_map(|event| match event {
                    GreeterEvent::Locked { message } => Some(message.clone()),
                    GreeterEvent::Greeted { .. } => None,
                });
                match notice {
                    Some(message) => self.set_toast(message, ToastLevel::Warn),
                    None => self.set_toast(
                        format!("{method} included in block {}", block_label(outcome.block_number)),
                        ToastLevel::Success,
                    ),
                }
                self.last_tx = Some(LastTx { method, outcome });
                self.refresh_after_tx(method);
            }
            RuntimeEvent::TxFailed { method, message } => {
                self.ctx.submitting = false;
                self.set_toast(format!("{method} failed: {message}"), ToastLevel::Error);
                self.refresh_after_tx(method);
            }
            RuntimeEvent::BalanceReady { contract, caller } => {
                self.contract_balance = Some(contract);
                self.caller_balance = caller;
                self.set_toast(format!("Contract balance: {contract}"), ToastLevel::Info);
            }
            RuntimeEvent::Error { message } => {
                self.set_toast(message, ToastLevel::Error);
            }
        }
    }

    fn refresh_after_tx(&mut self, method: &'static str) {
        if method == "setMessage" {
            self.pending_commands.push(RuntimeCommand::CheckLockState);
        }
        self.request_fetch();
    }

    /// Route a key to the form module
    pub fn handle_form_key(&mut self, key: KeyEvent) {
        let action = self.form.handle_key(key, &mut self.ctx);
        self.apply_action(action);
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Form;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }

        let action = match parse_command(&input) {
            Command::Endpoint(index) => {
                self.switch_endpoint(index);
                Action::None
            }
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
            cmd => self.form.handle_command(&cmd, &mut self.ctx),
        };
        self.command.last = Some(input);
        self.exit_command();
        self.apply_action(action);
    }

    /// Apply an action returned by a command or module
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Fetch => self.request_fetch(),
            Action::Submit(message) => self.submit_message(&message),
            Action::Unlock => self.unlock(),
            Action::Balance => self.request_balance(),
            Action::SwitchEndpoint(index) => self.switch_endpoint(Some(index)),
            Action::Copy(text) => self.pending_copy = Some(text),
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => ToastLevel::Info,
                    NotifyLevel::Warn => ToastLevel::Warn,
                    NotifyLevel::Error => ToastLevel::Error,
                };
                self.set_toast(msg, level);
            }
            Action::OpenCommand => self.enter_command(),
            Action::ToggleHelp => self.help_open = !self.help_open,
            Action::Quit => self.should_quit = true,
        }
    }

    /// Drain the commands queued for the runtime, in order
    pub fn take_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    pub fn take_copy_request(&mut self) -> Option<String> {
        self.pending_copy.take()
    }
}

fn block_label(number: Option<u64>) -> String {
    number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string())
}
