//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{admin, analytics, likes, options, polls, users, votes};
use super::state::AppState;
use crate::realtime::handler::{ws_global_handler, ws_poll_handler};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoints
        .route("/ws", get(ws_global_handler))
        .route("/ws/:poll_id", get(ws_poll_handler))
        // Health check and root
        .route("/health", get(health_check))
        .route("/", get(read_root))
        // Auth
        .route("/auth/register", post(users::register_user))
        .route("/auth/login", post(users::login_user))
        .route("/auth/me/:user_id", get(users::get_current_user))
        // Polls
        .route("/polls", post(polls::create_poll).get(polls::list_polls))
        .route("/polls/:poll_id", get(polls::get_poll))
        .route("/polls/:poll_id", put(polls::update_poll))
        .route("/polls/:poll_id", delete(polls::delete_poll))
        .route("/polls/:poll_id/close", post(polls::close_poll))
        // Options
        .route("/options", post(options::create_option))
        .route("/options/poll/:poll_id", get(options::get_poll_options))
        .route("/options/:option_id", delete(options::delete_option))
        // Votes
        .route("/votes", post(votes::create_vote))
        .route("/votes/poll/:poll_id", get(votes::get_poll_votes))
        .route("/votes/:vote_id", delete(votes::delete_vote))
        // Likes
        .route("/likes", post(likes::toggle_like))
        .route("/likes/poll/:poll_id", get(likes::get_poll_likes))
        .route("/likes/user/:user_id", get(likes::get_user_likes))
        // Admin
        .route("/admin/users", get(admin::get_all_users))
        .route("/admin/users/:user_id/role", put(admin::change_user_role))
        .route("/admin/stats", get(admin::get_platform_stats))
        .route("/admin/actions", get(admin::get_audit_log))
        .route("/admin/polls/:poll_id", delete(admin::remove_poll))
        // Analytics
        .route("/analytics/dashboard", get(analytics::get_dashboard))
        .route("/analytics/metrics", get(analytics::get_metrics))
        .route("/analytics/vote-trends", get(analytics::get_vote_trends))
        .route("/analytics/activities", get(analytics::get_activities))
        .route("/analytics/top-polls", get(analytics::get_top_polls))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Root endpoint
async fn read_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to QuickPoll" }))
}
