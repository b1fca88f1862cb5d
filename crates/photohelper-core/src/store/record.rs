//! JSON encoding of the session record.

use crate::models::User;

pub fn encode(user: &User) -> serde_json::Result<String> {
    serde_json::to_string(user)
}

pub fn decode(record: &str) -> serde_json::Result<User> {
    serde_json::from_str(record)
}
