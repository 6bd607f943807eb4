// User profile types

use serde::{Deserialize, Serialize};

use super::auth::UserRole;

/// Profile returned by `/users/me` and `/users/{loginId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: Option<i64>,
    pub login_id: String,
    pub username: String,
    pub email: String,
    pub user_role: UserRole,
}

/// Profile edit as the UI collects it
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMeRequest {
    pub username: String,
    pub email: String,
}

impl From<&ProfileUpdate> for UpdateMeRequest {
    fn from(update: &ProfileUpdate) -> Self {
        Self {
            username: update.name.clone(),
            email: update.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
