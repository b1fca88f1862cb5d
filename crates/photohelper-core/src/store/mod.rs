//! Persistence for the session record.
//!
//! Exactly one record is stored, under [`SESSION_KEY`]. Stores move opaque
//! strings; encoding lives in [`record`] so the manager can tell a broken
//! record apart from a broken store.
//!
//! - `FileStore`: JSON file in the app data directory
//! - `KeyringStore`: OS keychain entry
//! - `MemoryStore`: in-process, nothing survives the process

pub mod file;
pub mod keychain;
pub mod memory;
pub mod record;

use thiserror::Error;

pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;

/// Fixed key the session record lives under
pub const SESSION_KEY: &str = "current_user";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence for the serialized session record.
///
/// Calls are synchronous: the manager finishes the store operation before it
/// publishes the state that depends on it.
pub trait SessionStore: Send + Sync {
    /// Replace the stored record
    fn save(&self, record: &str) -> Result<(), StoreError>;

    /// Read the stored record, `None` if nothing is stored
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Remove the stored record. Removing a missing record succeeds.
    fn delete(&self) -> Result<(), StoreError>;
}
