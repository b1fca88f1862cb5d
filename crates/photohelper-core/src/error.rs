use thiserror::Error;

use crate::store::StoreError;

/// Failures the session manager reports to its caller.
///
/// Validation and identity-provider failures are not here: those are part of
/// the normal state flow and surface as [`AuthState::Error`](crate::AuthState::Error).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("Failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SessionError {
    /// True when the in-memory state changed but the stored record did not follow
    pub fn is_persistence(&self) -> bool {
        matches!(self, SessionError::Persistence(_))
    }
}
