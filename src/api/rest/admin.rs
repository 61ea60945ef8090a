//! Admin endpoints
//!
//! All routes require an admin user id in the `X-User-Id` header: 401
//! when missing or malformed, 403 when the user is not an admin.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::ErrorResponse;
use crate::api::state::AppState;
use crate::realtime::PollEvent;
use crate::types::{PlatformStats, RoleUpdate, User, UserOverview, UserResponse};

/// Resolve and verify the admin user from the `X-User-Id` header
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, ErrorResponse> {
    let user_id: i64 = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ErrorResponse::unauthorized("User ID required in X-User-Id header"))?;

    let user = state.store.get_user(user_id)?;
    if !user.is_admin() {
        return Err(ErrorResponse::forbidden("Admin access required"));
    }
    Ok(user)
}

/// GET /admin/users - All users with statistics
pub async fn get_all_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserOverview>>, ErrorResponse> {
    require_admin(&state, &headers)?;
    Ok(Json(state.store.user_overviews()))
}

/// GET /admin/stats - Platform statistics
pub async fn get_platform_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PlatformStats>, ErrorResponse> {
    require_admin(&state, &headers)?;
    Ok(Json(state.store.platform_stats()))
}

/// PUT /admin/users/:user_id/role - Change a user's role
pub async fn change_user_role(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<RoleUpdate>,
) -> Result<Json<UserResponse>, ErrorResponse> {
    let admin = require_admin(&state, &headers)?;

    let (old_role, user) = state.store.set_user_role(user_id, &req.role)?;
    state.store.log_admin_action(
        admin.id,
        "role_change",
        "user",
        user_id,
        Some(json!({ "old_role": old_role, "new_role": user.role })),
    )?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /admin/polls/:poll_id - Remove any poll (moderation)
pub async fn remove_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let admin = require_admin(&state, &headers)?;

    let poll = state.store.admin_delete_poll(poll_id)?;
    state.store.log_admin_action(
        admin.id,
        "content_delete",
        "poll",
        poll_id,
        Some(json!({ "title": poll.title })),
    )?;
    let event = PollEvent::PollDeleted { poll_id };
    state.dispatcher.notify_poll_changed(event, poll_id);
    state.dispatcher.notify_global(event);
    Ok(Json(json!({ "message": "Poll deleted successfully" })))
}

/// Query parameters for the audit log
#[derive(Debug, Deserialize)]
pub struct AuditLogParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub admin_id: Option<i64>,
}

fn default_limit() -> usize {
    50
}

/// GET /admin/actions - Admin action audit log
pub async fn get_audit_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    require_admin(&state, &headers)?;

    let limit = params.limit.clamp(1, 100);
    let actions = state
        .store
        .admin_actions(params.admin_id, limit, params.offset);

    Ok(Json(json!({
        "actions": actions,
        "limit": limit,
        "offset": params.offset,
    })))
}
