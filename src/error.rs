//! Error types for the few fallible edges of the engine.
//!
//! Formatting and evaluation never fail: bad input degrades to `neutral` or
//! `invalid` status. Errors only arise when a host hands the engine a bad
//! configuration value or a stale handle.

use std::fmt;

use crate::events::SubscriptionId;

/// Errors returned by engine construction helpers and the subscription API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A month outside 1-12 was supplied.
    InvalidMonth(u32),

    /// A year-month string could not be parsed.
    ///
    /// The expected format is `MM/YYYY`.
    InvalidYearMonth(String),

    /// A field name other than `card`, `expiry` or `cvv` was supplied.
    UnknownField(String),

    /// The subscription handle is not registered (already removed, or from
    /// another engine).
    UnknownSubscription(SubscriptionId),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth(m) => write!(f, "invalid month {}: must be 1-12", m),

            Self::InvalidYearMonth(input) => {
                write!(
                    f,
                    "invalid year-month '{}' (expected MM/YYYY)",
                    input.escape_default()
                )
            }

            Self::UnknownField(name) => {
                write!(
                    f,
                    "unknown field '{}' (expected card, expiry or cvv)",
                    name.escape_default()
                )
            }

            Self::UnknownSubscription(id) => {
                write!(f, "subscription {} is not registered", id)
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EngineError::InvalidMonth(13).to_string(),
            "invalid month 13: must be 1-12"
        );

        assert_eq!(
            EngineError::InvalidYearMonth("2024".into()).to_string(),
            "invalid year-month '2024' (expected MM/YYYY)"
        );

        assert_eq!(
            EngineError::UnknownField("zip".into()).to_string(),
            "unknown field 'zip' (expected card, expiry or cvv)"
        );

        assert_eq!(
            EngineError::UnknownSubscription(SubscriptionId::from_raw(7)).to_string(),
            "subscription #7 is not registered"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
