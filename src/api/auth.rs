// Authentication endpoints (login, signup, logout)

use serde_json::Value;

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::auth::{
    check_password_policy, LoginRequest, LogoutRequest, SignupForm, SignupRequest, TokenPair,
};
use crate::models::Envelope;

/// Log in and store the issued tokens in the session
#[tracing::instrument(skip(client, password))]
pub async fn login(
    client: &ApiHttpClient,
    login_id: &str,
    password: &str,
) -> Result<Envelope<TokenPair>, ApiError> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let request = LoginRequest {
        login_id: login_id.to_string(),
        password: password.to_string(),
    };

    let envelope: Envelope<TokenPair> = client
        .send_json(client.post(&["auth", "login"]).json(&request))
        .await?;

    match envelope.data.as_ref() {
        Some(tokens) => {
            client.session().store_tokens(tokens)?;
            tracing::info!(duration_ms = start.elapsed().as_millis(), "Login successful");
        }
        None => tracing::warn!("Login response carried no tokens"),
    }

    Ok(envelope)
}

/// Register a new account
///
/// The password is checked against the backend policy before anything is sent.
#[tracing::instrument(skip(client, form), fields(login_id = %form.login_id))]
pub async fn signup(client: &ApiHttpClient, form: &SignupForm) -> Result<Envelope<Value>, ApiError> {
    check_password_policy(&form.password)?;

    let request = SignupRequest::from(form);
    client
        .send_json(client.post(&["auth", "signup"]).json(&request))
        .await
}

/// Log out, revoking `refresh_token` or the stored one
///
/// Stored credentials are cleared whatever the backend answers.
pub async fn logout(
    client: &ApiHttpClient,
    refresh_token: Option<&str>,
) -> Result<Envelope<Value>, ApiError> {
    let session = client.session();
    let refresh_token = refresh_token
        .map(str::to_string)
        .or_else(|| session.refresh_token())
        .ok_or_else(|| ApiError::Session("No refresh token stored; not logged in".to_string()))?;

    let result = client
        .send_json(
            client
                .post(&["auth", "logout"])
                .json(&LogoutRequest { refresh_token }),
        )
        .await;

    if let Err(e) = session.clear_tokens() {
        tracing::warn!(error = %e, "Failed to clear stored tokens on logout");
    }

    result
}
