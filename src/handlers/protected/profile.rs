use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde_json::Value;

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::{ProfileUpdate, UserProfile};

/// GET /profile - Profile of the user named by the token
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let user = state.store.find_user(auth_user.id).await.ok_or_else(|| {
        tracing::warn!("Token subject {} no longer exists", auth_user.id);
        ApiError::not_found("User not found")
    })?;

    Ok(ApiResponse::success(user.to_profile()))
}

/// PUT /profile - Partial profile update
///
/// Accepts any of `name`, `preferences` (merged into the stored preferences),
/// and the pair `currentPassword` + `newPassword`. The password is only
/// changed when both are present and the current one verifies; a wrong current
/// password is a 401 and nothing is written.
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(payload) = payload?;
    let payload = super::expect_object(payload, "Profile data")?;
    let update: ProfileUpdate = serde_json::from_value(Value::Object(payload))
        .map_err(|e| ApiError::bad_request(format!("Invalid profile data: {}", e)))?;

    let mut user = state
        .store
        .find_user(auth_user.id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(name) = update.name.as_deref() {
        user.rename(name);
    }

    if let Some(preferences) = update.preferences {
        user.merge_preferences(preferences)?;
    }

    if let (Some(current), Some(new)) = (update.current_password.as_deref(), update.new_password.as_deref()) {
        if !verify_password(current, &user.password).await {
            tracing::warn!("Password change for user {} rejected: wrong current password", user.id);
            return Err(ApiError::unauthorized("Current password is incorrect"));
        }
        if new.is_empty() {
            return Err(ApiError::bad_request("New password must not be empty"));
        }
        user.password = hash_password(new, state.config.security.bcrypt_cost).await?;
        tracing::info!("Password changed for user {}", user.id);
    }

    let user = state.store.update_user(user).await?;
    Ok(ApiResponse::success(user.to_profile()))
}
