use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entitlements::Plan;

/// How the user authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Email,
    Apple,
    Google,
}

impl LoginMethod {
    pub const ALL: [LoginMethod; 3] = [LoginMethod::Email, LoginMethod::Apple, LoginMethod::Google];

    pub fn display_name(&self) -> &'static str {
        match self {
            LoginMethod::Email => "Email",
            LoginMethod::Apple => "Apple",
            LoginMethod::Google => "Google",
        }
    }

    /// Label shown on the profile screen, e.g. "Apple Account"
    pub fn account_label(&self) -> String {
        format!("{} Account", self.display_name())
    }
}

/// A signed-in account.
///
/// Equality ignores `created_at`: two records describe the same account state
/// when id, email, name, premium flag and login method all agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub login_method: LoginMethod,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.email == other.email
            && self.name == other.name
            && self.is_premium == other.is_premium
            && self.login_method == other.login_method
    }
}

impl Eq for User {}

impl User {
    /// Create a free-tier user with a freshly generated id
    pub fn new(email: impl Into<String>, name: impl Into<String>, login_method: LoginMethod) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), email, name, login_method)
    }

    /// Create a free-tier user with an id supplied by an identity provider
    pub fn with_id(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        login_method: LoginMethod,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            is_premium: false,
            created_at: Utc::now(),
            login_method,
        }
    }

    /// Copy of this user holding the premium entitlement
    pub fn with_premium(&self) -> Self {
        Self {
            is_premium: true,
            ..self.clone()
        }
    }

    pub fn plan(&self) -> Plan {
        if self.is_premium {
            Plan::Premium
        } else {
            Plan::Free
        }
    }

    /// Account creation date for display ("Dec 14, 2024")
    pub fn member_since(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }
}
