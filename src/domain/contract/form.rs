//! Client-side validation for the update-greeting form

use thiserror::Error;

/// Minimum accepted message length, in characters
pub const MESSAGE_MIN_LEN: usize = 1;
/// Maximum accepted message length, in characters
pub const MESSAGE_MAX_LEN: usize = 90;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("newMessage must contain at least {MESSAGE_MIN_LEN} character(s)")]
    TooShort,
    #[error("newMessage must contain at most {MESSAGE_MAX_LEN} character(s), got {0}")]
    TooLong(usize),
}

/// Validated form payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGreeting {
    pub new_message: String,
}

impl UpdateGreeting {
    /// Validate raw input. Length is counted in characters, not bytes.
    pub fn parse(input: &str) -> Result<Self, FormError> {
        let len = input.chars().count();
        if len < MESSAGE_MIN_LEN {
            return Err(FormError::TooShort);
        }
        if len > MESSAGE_MAX_LEN {
            return Err(FormError::TooLong(len));
        }
        Ok(Self {
            new_message: input.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(UpdateGreeting::parse(""), Err(FormError::TooShort));
    }

    #[test]
    fn test_bounds() {
        assert!(UpdateGreeting::parse("a").is_ok());
        assert!(UpdateGreeting::parse(&"x".repeat(90)).is_ok());
        assert_eq!(
            UpdateGreeting::parse(&"x".repeat(91)),
            Err(FormError::TooLong(91))
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 90 multi-byte characters are still within bounds
        assert!(UpdateGreeting::parse(&"é".repeat(90)).is_ok());
    }
}
