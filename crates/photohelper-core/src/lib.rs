//! Core library for photo-helper.
//!
//! This crate owns the account side of the app: who is signed in, how they
//! signed in, whether they hold the premium entitlement, and how that session
//! survives a restart.
//!
//! - [`SessionManager`]: the authentication state machine
//! - [`SessionStore`]: persistence for the single session record
//! - [`User`] / [`LoginMethod`]: the account model
//! - [`Plan`] / [`PremiumFeature`]: what the premium entitlement unlocks

pub mod auth;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use auth::{AuthState, SessionManager, SessionOptions};
pub use config::{Config, StoreBackend};
pub use entitlements::{Plan, PremiumFeature};
pub use error::SessionError;
pub use models::{LoginMethod, User};
pub use store::{FileStore, KeyringStore, MemoryStore, SessionStore, StoreError};
