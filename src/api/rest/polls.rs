//! Poll endpoints
//!
//! Every successful mutation commits to the store first, then hands a
//! notification to the dispatcher as a background task; the response
//! never waits on WebSocket delivery.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ErrorResponse, UserParam, ViewerParam};
use crate::api::state::AppState;
use crate::realtime::PollEvent;
use crate::types::{PollCreate, PollDetail, PollUpdate};

/// Query parameters for poll creation
#[derive(Debug, Deserialize)]
pub struct CreatorParam {
    pub creator_id: i64,
}

/// POST /polls - Create a poll with its options
pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreatorParam>,
    Json(req): Json<PollCreate>,
) -> Result<Json<PollDetail>, ErrorResponse> {
    let detail = state.store.create_poll(params.creator_id, req)?;
    let event = PollEvent::PollUpdated { poll_id: detail.id };
    state.dispatcher.notify_poll_changed(event, detail.id);
    state.dispatcher.notify_global(event);
    Ok(Json(detail))
}

/// Query parameters for listing polls
#[derive(Debug, Deserialize)]
pub struct ListPollsParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub user_id: Option<i64>,
}

fn default_limit() -> usize {
    100
}

/// GET /polls - List polls with stats
pub async fn list_polls(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPollsParams>,
) -> Result<Json<Vec<PollDetail>>, ErrorResponse> {
    let polls = state
        .store
        .list_polls(params.skip, params.limit.min(1000), params.user_id)?;
    Ok(Json(polls))
}

/// GET /polls/:poll_id - Fetch one poll with stats
pub async fn get_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
    Query(params): Query<ViewerParam>,
) -> Result<Json<PollDetail>, ErrorResponse> {
    let detail = state.store.poll_detail(poll_id, params.user_id)?;
    Ok(Json(detail))
}

/// PUT /polls/:poll_id - Update a poll (creator only)
pub async fn update_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
    Query(params): Query<UserParam>,
    Json(patch): Json<PollUpdate>,
) -> Result<Json<PollDetail>, ErrorResponse> {
    let detail = state.store.update_poll(poll_id, params.user_id, patch)?;
    let event = PollEvent::PollUpdated { poll_id };
    state.dispatcher.notify_poll_changed(event, poll_id);
    state.dispatcher.notify_global(event);
    Ok(Json(detail))
}

/// POST /polls/:poll_id/close - Close a poll early (creator only)
pub async fn close_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<PollDetail>, ErrorResponse> {
    let (detail, transitioned) = state.store.close_poll(poll_id, params.user_id)?;
    if transitioned {
        let event = PollEvent::PollClosed { poll_id };
        state.dispatcher.notify_poll_changed(event, poll_id);
        state.dispatcher.notify_global(event);
    }
    Ok(Json(detail))
}

/// DELETE /polls/:poll_id - Delete a poll (creator only)
pub async fn delete_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<Value>, ErrorResponse> {
    state.store.delete_poll(poll_id, params.user_id)?;
    let event = PollEvent::PollDeleted { poll_id };
    state.dispatcher.notify_poll_changed(event, poll_id);
    state.dispatcher.notify_global(event);
    Ok(Json(json!({ "message": "Poll deleted successfully" })))
}
