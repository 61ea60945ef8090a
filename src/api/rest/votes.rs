//! Vote endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{ErrorResponse, UserParam};
use crate::api::state::AppState;
use crate::realtime::PollEvent;
use crate::types::{Vote, VoteCreate};

/// POST /votes - Cast or move a vote on an active poll
pub async fn create_vote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParam>,
    Json(req): Json<VoteCreate>,
) -> Result<Json<Vote>, ErrorResponse> {
    let vote = state
        .store
        .cast_vote(params.user_id, req.poll_id, req.option_id)?;
    let event = PollEvent::PollUpdated { poll_id: req.poll_id };
    state.dispatcher.notify_poll_changed(event, req.poll_id);
    state.dispatcher.notify_global(event);
    Ok(Json(vote))
}

/// GET /votes/poll/:poll_id - All votes on a poll
pub async fn get_poll_votes(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
) -> Json<Vec<Vote>> {
    Json(state.store.votes_for_poll(poll_id))
}

/// DELETE /votes/:vote_id - Retract a vote (owner only)
pub async fn delete_vote(
    State(state): State<Arc<AppState>>,
    Path(vote_id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<Value>, ErrorResponse> {
    state.store.delete_vote(vote_id, params.user_id)?;
    Ok(Json(json!({ "message": "Vote deleted successfully" })))
}
