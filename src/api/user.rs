// User profile endpoints

use serde_json::Value;

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::auth::check_password_policy;
use crate::models::user::{ProfileUpdate, UpdateMeRequest, UpdatePasswordRequest, UserInfo};
use crate::models::Envelope;

/// Profile of the logged-in user
pub async fn get_me(client: &ApiHttpClient) -> Result<Envelope<UserInfo>, ApiError> {
    client.send_json(client.get(&["users", "me"])).await
}

/// Another user's profile (HQ only)
pub async fn get_user(client: &ApiHttpClient, login_id: &str) -> Result<Envelope<UserInfo>, ApiError> {
    client.send_json(client.get(&["users", login_id])).await
}

pub async fn update_me(
    client: &ApiHttpClient,
    update: &ProfileUpdate,
) -> Result<Envelope<Value>, ApiError> {
    client
        .send_json(
            client
                .patch(&["users", "me"])
                .json(&UpdateMeRequest::from(update)),
        )
        .await
}

pub async fn update_password(
    client: &ApiHttpClient,
    old_password: &str,
    new_password: &str,
) -> Result<Envelope<Value>, ApiError> {
    check_password_policy(new_password)?;

    let request = UpdatePasswordRequest {
        current_password: old_password.to_string(),
        new_password: new_password.to_string(),
    };
    client
        .send_json(client.patch(&["users", "me", "password"]).json(&request))
        .await
}

/// Delete the logged-in account
pub async fn withdraw(client: &ApiHttpClient) -> Result<Envelope<Value>, ApiError> {
    let envelope = client.send_json(client.delete(&["users", "me"])).await?;
    if let Err(e) = client.session().clear_tokens() {
        tracing::warn!(error = %e, "Failed to clear stored tokens after withdrawal");
    }
    Ok(envelope)
}
