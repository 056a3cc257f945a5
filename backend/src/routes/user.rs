//! User profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UpdateUser;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use bookshelf_shared::{UpdateUserRequest, UserProfile};
use validator::Validate;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// GET /api/v1/user/profile - Get the caller's profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.users().profile(auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/user/profile - Update the caller's profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    req.validate()?;

    let profile = state
        .users()
        .update(auth.user_id, UpdateUser::from(req))
        .await?;
    Ok(Json(profile))
}
