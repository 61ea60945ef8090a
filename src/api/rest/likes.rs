//! Like endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{ErrorResponse, UserParam};
use crate::api::state::AppState;
use crate::realtime::PollEvent;
use crate::store::LikeOutcome;
use crate::types::{Like, LikeCreate};

/// POST /likes - Toggle a like on a poll
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParam>,
    Json(req): Json<LikeCreate>,
) -> Result<Response, ErrorResponse> {
    let outcome = state.store.toggle_like(params.user_id, req.poll_id)?;
    state
        .dispatcher
        .notify_poll_changed(PollEvent::PollUpdated { poll_id: req.poll_id }, req.poll_id);

    let response = match outcome {
        LikeOutcome::Liked(like) => Json(like).into_response(),
        LikeOutcome::Removed => {
            Json(json!({ "message": "Like removed", "liked": false })).into_response()
        }
    };
    Ok(response)
}

/// GET /likes/poll/:poll_id - Likes on a poll
pub async fn get_poll_likes(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
) -> Json<serde_json::Value> {
    let likes: Vec<Like> = state.store.likes_for_poll(poll_id);
    Json(json!({
        "poll_id": poll_id,
        "likes_count": likes.len(),
        "likes": likes,
    }))
}

/// GET /likes/user/:user_id - Likes by a user
pub async fn get_user_likes(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Json<serde_json::Value> {
    let likes: Vec<Like> = state.store.likes_by_user(user_id);
    Json(json!({
        "user_id": user_id,
        "likes": likes,
    }))
}
