use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub store_id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub store_id: i32,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            store_id: value.store_id,
            username: value.username,
            password_hash: value.password_hash,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            store_id: value.store_id,
            username: value.username.as_str(),
            password_hash: value.password_hash.as_str(),
            role: value.role.as_str(),
        }
    }
}
