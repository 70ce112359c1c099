//! Actions that modules and commands return to the app

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Re-read greeting and lock state
    Fetch,

    /// Submit the update-greeting form with this message
    Submit(String),

    /// Send `unlock`
    Unlock,

    /// Fetch contract and caller balances
    Balance,

    /// Switch to the endpoint at this index
    SwitchEndpoint(usize),

    /// Copy text to the system clipboard
    Copy(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open command palette
    OpenCommand,

    /// Toggle the help overlay
    ToggleHelp,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
