//! Module trait for interactive UI components

use crossterm::event::KeyEvent;

use super::{Action, Command, Context};

/// A panel that owns some input state and turns keys and `:` commands into actions
pub trait Module {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action;

    /// Commands the module does not recognise fall through as `Action::None`
    fn handle_command(&mut self, _cmd: &Command, _ctx: &mut Context) -> Action {
        Action::None
    }
}
