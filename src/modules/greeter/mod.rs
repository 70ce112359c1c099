//! Greeter form module - the update-greeting input and the two buttons

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{Action, Command, Context, Module, NotifyLevel};
use crate::domain::contract::{UpdateGreeting, MESSAGE_MAX_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Input,
    Submit,
    Unlock,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::Input => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Unlock,
            FormFocus::Unlock => FormFocus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormFocus::Input => FormFocus::Unlock,
            FormFocus::Submit => FormFocus::Input,
            FormFocus::Unlock => FormFocus::Submit,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GreeterForm {
    input: String,
    focus: FormFocus,
}

impl GreeterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
    }

    /// Clear the input after a successful transaction
    pub fn reset(&mut self) {
        self.input.clear();
    }

    /// "12/90" style counter
    pub fn counter(&self) -> String {
        format!("{}/{}", self.input.chars().count(), MESSAGE_MAX_LEN)
    }

    /// Validation message for the current input, if it is non-empty and invalid
    pub fn validation_hint(&self) -> Option<String> {
        if self.input.is_empty() {
            return None;
        }
        UpdateGreeting::parse(&self.input)
            .err()
            .map(|err| err.to_string())
    }

    fn copy_contract(ctx: &Context) -> Action {
        match ctx.contract {
            Some(address) => Action::Copy(address.to_checksum(None)),
            None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.focus = FormFocus::Submit;
                Action::None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                Action::None
            }
            KeyCode::Enter => Action::Submit(self.input.clone()),
            KeyCode::Backspace if !ctx.submitting => {
                self.input.pop();
                Action::None
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                // input is disabled while a transaction is in flight
                if !ctx.submitting {
                    self.input.push(ch);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_button_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.focus = self.focus.prev();
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                FormFocus::Unlock => Action::Unlock,
                _ => Action::Submit(self.input.clone()),
            },
            KeyCode::Char('i') | KeyCode::Char('e') => {
                self.focus = FormFocus::Input;
                Action::None
            }
            KeyCode::Char(':') => Action::OpenCommand,
            KeyCode::Char('r') => Action::Fetch,
            KeyCode::Char('u') => Action::Unlock,
            KeyCode::Char('b') => Action::Balance,
            KeyCode::Char('y') | KeyCode::Char('c') => Self::copy_contract(ctx),
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }
}

impl Module for GreeterForm {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        match self.focus {
            FormFocus::Input => self.handle_input_key(key, ctx),
            FormFocus::Submit | FormFocus::Unlock => self.handle_button_key(key, ctx),
        }
    }

    fn handle_command(&mut self, cmd: &Command, ctx: &mut Context) -> Action {
        match cmd {
            Command::Set(message) => {
                self.input = message.clone();
                Action::Submit(message.clone())
            }
            Command::Refresh => Action::Fetch,
            Command::Unlock => Action::Unlock,
            Command::Balance => Action::Balance,
            Command::Copy => Self::copy_contract(ctx),
            Command::Help => Action::ToggleHelp,
            Command::Quit => Action::Quit,
            Command::Endpoint(_) | Command::Unknown(_) => Action::None,
        }
    }
}
