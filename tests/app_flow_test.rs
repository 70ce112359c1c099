//! Form orchestration without a terminal: keys in, runtime commands out

use alloy::primitives::{address, Address, B256};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use greeter_console::app::{App, ToastLevel, FETCH_ERROR_TOAST, LOADING_LABEL, WALLET_TOAST};
use greeter_console::domain::contract::FormError;
use greeter_console::infrastructure::contract::TxOutcome;
use greeter_console::infrastructure::runtime::{RuntimeCommand, RuntimeEvent};

const CONTRACT: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
const WALLET: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// Connected app with the initial fetch already answered
fn ready(caller: Option<Address>) -> App {
    let mut app = App::new(100, 1000);
    app.endpoints = vec!["dev".to_string()];
    app.apply_event(RuntimeEvent::Connected {
        index: 0,
        endpoint: "dev".to_string(),
        node_kind: "devchain".to_string(),
        contract: CONTRACT,
        caller,
    });
    app.take_commands();
    app.apply_event(RuntimeEvent::GreetingLoaded {
        greeting: "Hello ink!".to_string(),
        locked: false,
    });
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_form_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn included(block: u64) -> TxOutcome {
    TxOutcome {
        tx_hash: B256::repeat_byte(0xab),
        block_number: Some(block),
        gas_used: 21_000,
        success: true,
        events: Vec::new(),
    }
}

#[test]
fn test_placeholders_until_first_fetch() {
    let app = App::new(100, 1000);
    assert_eq!(app.greeting_label(), LOADING_LABEL);
    assert_eq!(app.lock_label(), LOADING_LABEL);
    assert_eq!(app.contract_label(), LOADING_LABEL);

    let app = ready(None);
    assert_eq!(app.greeting_label(), "Hello ink!");
    assert_eq!(app.lock_label(), "false");
    assert!(app.buttons_enabled());
}

#[test]
fn test_empty_message_is_rejected_locally() {
    let mut app = ready(Some(WALLET));
    press(&mut app, KeyCode::Enter);

    assert!(app.take_commands().is_empty());
    assert_eq!(
        app.toast_text(),
        Some((FormError::TooShort.to_string().as_str(), ToastLevel::Warn))
    );
    assert!(!app.is_submitting());
}

#[test]
fn test_too_long_message_is_rejected_locally() {
    let mut app = ready(Some(WALLET));
    type_text(&mut app, &"x".repeat(91));
    assert!(app.form.validation_hint().is_some());

    press(&mut app, KeyCode::Enter);
    assert!(app.take_commands().is_empty());
}

#[test]
fn test_submit_without_wallet_raises_toast() {
    let mut app = ready(None);
    type_text(&mut app, "hi");
    press(&mut app, KeyCode::Enter);

    assert!(app.take_commands().is_empty());
    assert_eq!(app.toast_text(), Some((WALLET_TOAST, ToastLevel::Error)));
    assert_eq!(app.form.input(), "hi");
}

#[test]
fn test_submit_sends_set_message_then_refreshes() {
    let mut app = ready(Some(WALLET));
    type_text(&mut app, "gm");
    press(&mut app, KeyCode::Enter);

    let commands = app.take_commands();
    assert!(matches!(
        commands.as_slice(),
        [RuntimeCommand::SetMessage { message, value: 100 }] if message == "gm"
    ));
    assert!(app.is_submitting());
    assert!(!app.buttons_enabled());

    // input is frozen while the transaction is in flight
    type_text(&mut app, "zzz");
    assert_eq!(app.form.input(), "gm");

    app.apply_event(RuntimeEvent::TxSucceeded {
        method: "setMessage",
        outcome: included(1),
    });
    assert!(!app.is_submitting());
    assert_eq!(app.form.input(), "");
    assert!(matches!(
        app.take_commands().as_slice(),
        [RuntimeCommand::CheckLockState, RuntimeCommand::FetchGreeting]
    ));
    assert_eq!(
        app.toast_text(),
        Some(("setMessage included in block 1", ToastLevel::Success))
    );
}

#[test]
fn test_unlock_button_sends_configured_value() {
    let mut app = ready(Some(WALLET));
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);

    assert!(matches!(
        app.take_commands().as_slice(),
        [RuntimeCommand::Unlock { value: 1000 }]
    ));

    app.apply_event(RuntimeEvent::TxFailed {
        method: "unlock",
        message: "contract error: insufficient balance".to_string(),
    });
    assert!(!app.is_submitting());
    assert!(matches!(
        app.take_commands().as_slice(),
        [RuntimeCommand::FetchGreeting]
    ));
    assert_eq!(app.toast_text().map(|(_, level)| level), Some(ToastLevel::Error));
}

#[test]
fn test_failed_fetch_clears_greeting() {
    let mut app = ready(None);
    app.request_fetch();
    app.take_commands();

    app.apply_event(RuntimeEvent::FetchFailed {
        message: "transport error: connection refused".to_string(),
    });
    assert!(app.greeting.is_none());
    assert!(!app.is_loading());
    assert_eq!(app.greeting_label(), "");
    assert_eq!(app.toast_text(), Some((FETCH_ERROR_TOAST, ToastLevel::Error)));
}

#[test]
fn test_command_line_set_submits() {
    let mut app = ready(Some(WALLET));
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char(':'));
    app.command.input = "set from the command line".to_string();
    app.apply_command();

    assert!(matches!(
        app.take_commands().as_slice(),
        [RuntimeCommand::SetMessage { message, .. }] if message == "from the command line"
    ));
}

#[test]
fn test_copy_contract_address() {
    let mut app = ready(None);
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(
        app.take_copy_request(),
        Some(CONTRACT.to_checksum(None))
    );
}
