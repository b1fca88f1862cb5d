//! Local credential rules.
//!
//! There is no auth backend, so "valid credentials" means a well-formed email
//! and a long enough password. The manager re-checks these itself and never
//! trusts the caller's form checks.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

const EMAIL_PATTERN: &str = r"^[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$";

/// Rejections from the manager's own credential check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email or password too short")]
    InvalidCredentials,

    #[error("Please enter your name")]
    MissingName,
}

/// Rejections from the sign-in form, before the manager is called
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    EmptyFields,

    #[error("Please enter your name")]
    MissingName,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Check an email sign-in or sign-up request
pub fn validate_email_login(
    email: &str,
    password: &str,
    is_new_user: bool,
    name: &str,
) -> Result<(), ValidationError> {
    if !is_valid_email(email) || !is_valid_password(password) {
        return Err(ValidationError::InvalidCredentials);
    }
    if is_new_user && name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    Ok(())
}

/// Display name for a returning email user: the local part of the address
pub fn name_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or("User")
        .to_string()
}

/// Contents of the email sign-in / sign-up form
#[derive(Debug, Clone, Default)]
pub struct EmailForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub is_new_user: bool,
}

impl EmailForm {
    /// Form-level checks a front end runs before submitting
    pub fn check(&self) -> Result<(), FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::EmptyFields);
        }
        if self.is_new_user {
            if self.name.is_empty() {
                return Err(FormError::MissingName);
            }
            if self.password != self.confirm_password {
                return Err(FormError::PasswordMismatch);
            }
        }
        Ok(())
    }
}
