//! Authentication routes
//!
//! Registration and login. Neither requires a token.

use crate::error::ApiResult;
use crate::services::NewUser;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use bookshelf_shared::{AuthResponse, LoginRequest, RegisterRequest};
use validator::Validate;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let user = state.auth().register(NewUser::from(req)).await?;
    let response = state.auth().issue_response(user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.auth().login(&req.email, &req.password).await?;
    Ok(Json(response))
}
