use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => f.write_str("user"),
            UserRole::Admin => f.write_str("admin"),
        }
    }
}

/// Account record. The password is kept in plaintext and the email is not unique.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, JsonSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

impl RegisterRequest {
    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            role: self.role.unwrap_or_default(),
            password: self.password,
        }
    }
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
