/// Authenticated user endpoints
///
/// - `GET /v1/user/current` - The caller's own profile
///
/// These routes sit behind the bearer-token middleware, which puts an
/// `AuthContext` into request extensions.

use crate::{
    app::{AppState, AuthContext},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use teamspace_shared::models::user::{User, UserProfile};

/// Current-user response
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Returns the authenticated caller's profile.
///
/// # Errors
///
/// - `404 Not Found`: the token's user no longer exists
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(CurrentUserResponse {
        message: "User fetched successfully".to_string(),
        user: user.into_profile(),
    }))
}
