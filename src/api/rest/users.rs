//! Auth endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::ErrorResponse;
use crate::api::state::AppState;
use crate::types::{UserCreate, UserLogin, UserResponse};

/// POST /auth/register - Create a new account
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserCreate>,
) -> Result<Json<UserResponse>, ErrorResponse> {
    let user = state.store.create_user(req)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
}

/// POST /auth/login - Verify credentials
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserLogin>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    let user = state.store.verify_credentials(&req.username, &req.password)?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.id,
        username: user.username,
    }))
}

/// GET /auth/me/:user_id - Fetch a user's public profile
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ErrorResponse> {
    let user = state.store.get_user(user_id)?;
    Ok(Json(UserResponse::from(&user)))
}
