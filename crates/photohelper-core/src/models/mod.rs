//! Account data models.

pub mod user;

pub use user::{LoginMethod, User};
