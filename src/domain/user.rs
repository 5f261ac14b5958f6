use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An account able to log into a store. The first user of a store is always
/// an admin; further users require the `multi_user` feature.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i32,
    pub store_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub store_id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl NewUser {
    pub fn new(
        store_id: i32,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            username: username.into(),
            password_hash: password_hash.into(),
            role: role.into(),
        }
    }
}
