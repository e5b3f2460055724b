use axum::extract::{rejection::PathRejection, Path, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::UserProfile;

/// GET /users - Public views of every user
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserProfile>> {
    let users = state.store.list_users().await;
    Ok(ApiResponse::success(users.iter().map(|u| u.to_profile()).collect()))
}

/// GET /users/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<UserProfile> {
    let Path(id) = id?;
    let user = state
        .store
        .find_user(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;
    Ok(ApiResponse::success(user.to_profile()))
}
