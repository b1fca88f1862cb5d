use std::fmt;

use crate::models::User;

/// Authentication state published by the session manager.
///
/// `Error` is transient: whoever renders it acknowledges it, which moves the
/// manager back to `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Unauthenticated,
    Error(String),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AuthState::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AuthState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Loading => write!(f, "Loading"),
            AuthState::Authenticated(user) => write!(
                f,
                "Signed in as {} <{}> ({})",
                user.name,
                user.email,
                user.plan().label()
            ),
            AuthState::Unauthenticated => write!(f, "Signed out"),
            AuthState::Error(message) => write!(f, "Error: {}", message),
        }
    }
}
