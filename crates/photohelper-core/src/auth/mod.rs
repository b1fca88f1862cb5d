//! Authentication module for managing the signed-in account.
//!
//! This module provides:
//! - `SessionManager`: the login / logout / restore / upgrade state machine
//! - `AuthState`: the observable state it publishes
//! - `validation`: local credential rules (there is no auth backend)
//! - `provider`: the seam to federated identity providers
//!
//! The session record is restored from a [`SessionStore`](crate::SessionStore)
//! once, when the manager is constructed.

pub mod provider;
pub mod session;
pub mod state;
pub mod validation;

pub use provider::{
    FederatedCredential, FederatedResult, IdentityProvider, ProviderFailure, StaticIdentityProvider,
};
pub use session::{SessionManager, SessionOptions};
pub use state::AuthState;
pub use validation::{EmailForm, FormError, ValidationError};
