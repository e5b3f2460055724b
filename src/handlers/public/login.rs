use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::LoginResponse;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /login - Verify credentials and issue a bearer token
///
/// Input: `{"email": "...", "password": "..."}`
///
/// Output: `{"accessToken": "...", "user": {id, name, email, preferences}}`
///
/// Every credential failure is a 400 with the same message, so the response
/// does not reveal whether the email exists.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(body) = body?;
    let email = body.email.unwrap_or_default().trim().to_string();
    let password = body.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Email format is invalid"));
    }

    let user = match state.store.find_user_by_email(&email).await {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown email {}", email);
            return Err(ApiError::bad_request("Incorrect email or password"));
        }
    };

    if !verify_password(&password, &user.password).await {
        tracing::warn!("Login attempt with wrong password for user {}", user.id);
        return Err(ApiError::bad_request("Incorrect email or password"));
    }

    let security = &state.config.security;
    let claims = Claims::new(user.id, &user.email, security.jwt_expiry_hours);
    let access_token = generate_jwt(&claims, security)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!("User {} signed in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        access_token,
        user: user.to_profile(),
    }))
}
