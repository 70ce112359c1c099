//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-fetch greeting and lock state
    Refresh,
    /// Update the greeting
    Set(String),
    Unlock,
    Balance,
    /// Switch endpoint; `None` means "next"
    Endpoint(Option<usize>),
    /// Copy the contract address
    Copy,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    match cmd.to_lowercase().as_str() {
        "refresh" | "r" | "greet" | "fetch" => Command::Refresh,
        "set" | "update" | "msg" => match args {
            Some(message) => Command::Set(message),
            None => Command::Unknown(input.to_string()),
        },
        "unlock" => Command::Unlock,
        "balance" | "bal" => Command::Balance,
        "endpoint" | "ep" | "rpc" => match args {
            None => Command::Endpoint(None),
            // endpoints are numbered from 1 in the UI
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Endpoint(Some(n - 1)),
                _ => Command::Unknown(input.to_string()),
            },
        },
        "copy" | "yank" | "y" => Command::Copy,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contract_commands() {
        assert_eq!(parse_command("refresh"), Command::Refresh);
        assert_eq!(parse_command("greet"), Command::Refresh);
        assert_eq!(parse_command("unlock"), Command::Unlock);
        assert_eq!(parse_command("bal"), Command::Balance);
    }

    #[test]
    fn test_set_keeps_message_verbatim() {
        assert_eq!(
            parse_command("set  Hello there, world "),
            Command::Set("Hello there, world".to_string())
        );
        assert_eq!(parse_command("set"), Command::Unknown("set".to_string()));
    }

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(parse_command("endpoint"), Command::Endpoint(None));
        assert_eq!(parse_command("ep 2"), Command::Endpoint(Some(1)));
        assert_eq!(parse_command("ep 0"), Command::Unknown("ep 0".to_string()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
