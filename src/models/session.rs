use crate::models::user::User;
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Client-held authentication state. The token is a fixed placeholder, not a credential.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}
