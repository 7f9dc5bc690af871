//! User identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Identifier of a remote user, as used in `/users/{id}` paths.
///
/// The API is free to use numeric or string ids, so the value is kept as
/// text. It is always sent as a single percent-encoded path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create an id, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SessionError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    /// The id as sent to the API.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        let id = UserId::from(42);
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_parse_valid() {
        let id: UserId = "abc-123".parse().unwrap();
        assert_eq!(id.as_str(), "abc-123");

        let trimmed: UserId = "  7 ".parse().unwrap();
        assert_eq!(trimmed.as_str(), "7");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<UserId>().is_err());
        assert!("   ".parse::<UserId>().is_err());
        assert!(matches!(
            UserId::new(""),
            Err(SessionError::InvalidUserId(_))
        ));
    }

    #[test]
    fn test_serializes_as_string() {
        let id = UserId::from(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5\"");
    }
}
