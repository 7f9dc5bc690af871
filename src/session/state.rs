//! Session state machine.

use std::fmt;

use serde::Serialize;

/// Authentication state of the client session.
///
/// Valid transitions:
/// - Anonymous -> Authenticated (login, or restore followed by verification)
/// - Authenticated -> Anonymous (logout, or failed verification)
///
/// There is no pending state; in-flight actions are serialized by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No token is held.
    #[default]
    Anonymous,
    /// A token (and its user) is held.
    Authenticated,
}

impl SessionState {
    /// Derive the state from token presence.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => SessionState::Authenticated,
            _ => SessionState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Anonymous => f.write_str("anonymous"),
            SessionState::Authenticated => f.write_str("authenticated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(SessionState::from_token(None), SessionState::Anonymous);
        assert_eq!(SessionState::from_token(Some("")), SessionState::Anonymous);
        assert_eq!(
            SessionState::from_token(Some("T1")),
            SessionState::Authenticated
        );
    }

    #[test]
    fn test_is_authenticated() {
        assert!(!SessionState::Anonymous.is_authenticated());
        assert!(SessionState::Authenticated.is_authenticated());
    }

    #[test]
    fn test_default() {
        assert_eq!(SessionState::default(), SessionState::Anonymous);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(SessionState::Authenticated.to_string(), "authenticated");
        assert_eq!(
            serde_json::to_string(&SessionState::Anonymous).unwrap(),
            "\"anonymous\""
        );
    }
}
