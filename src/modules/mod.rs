//! UI Modules
//!
//! Each module implements the Module trait and handles its own key input
//! and `:` commands.
//!
//! Modules:
//! - greeter: update-greeting form and unlock button

pub mod greeter;
