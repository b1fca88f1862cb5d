//! Federated identity provider seam.
//!
//! The platform layer runs the provider's sign-in UI and hands the outcome to
//! [`SessionManager::login_with_apple`](crate::SessionManager::login_with_apple).
//! The manager trusts a successful result as-is.

use thiserror::Error;

/// Email used when the provider withholds the address (repeat sign-ins)
pub const PLACEHOLDER_EMAIL: &str = "apple.user@example.com";

/// Name used when the provider supplies no name parts
pub const PLACEHOLDER_NAME: &str = "Apple User";

/// Identity returned by a successful federated sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    /// Stable provider-scoped user id
    pub user_id: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl FederatedCredential {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            given_name: None,
            family_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, given: Option<String>, family: Option<String>) -> Self {
        self.given_name = given;
        self.family_name = family;
        self
    }

    pub fn email_or_placeholder(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string())
    }

    /// Name parts joined with a single space, or the placeholder name
    pub fn display_name(&self) -> String {
        let joined = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            joined
        }
    }
}

/// Why a federated sign-in did not complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderFailure(pub String);

pub type FederatedResult = Result<FederatedCredential, ProviderFailure>;

/// Entry point of a federated identity provider.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self) -> FederatedResult;
}

/// Provider that always returns the same outcome.
pub struct StaticIdentityProvider {
    result: FederatedResult,
}

impl StaticIdentityProvider {
    pub fn succeeding(credential: FederatedCredential) -> Self {
        Self { result: Ok(credential) }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(ProviderFailure(reason.into())),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn sign_in(&self) -> FederatedResult {
        self.result.clone()
    }
}
