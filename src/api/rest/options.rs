//! Option endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ErrorResponse;
use crate::api::state::AppState;
use crate::types::{OptionCreate, OptionDetail, PollOption};

/// Query parameters for option creation
#[derive(Debug, Deserialize)]
pub struct OptionParams {
    pub poll_id: i64,
    pub user_id: i64,
}

/// POST /options - Add an option to a poll (creator only)
pub async fn create_option(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OptionParams>,
    Json(req): Json<OptionCreate>,
) -> Result<Json<OptionDetail>, ErrorResponse> {
    let option = state.store.add_option(params.poll_id, params.user_id, req)?;
    Ok(Json(option))
}

/// GET /options/poll/:poll_id - List a poll's options
pub async fn get_poll_options(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
) -> Json<Vec<PollOption>> {
    Json(state.store.options_for_poll(poll_id))
}

/// Query parameter for option deletion
#[derive(Debug, Deserialize)]
pub struct DeleteOptionParams {
    pub user_id: i64,
}

/// DELETE /options/:option_id - Remove an option and its votes (creator
/// only)
pub async fn delete_option(
    State(state): State<Arc<AppState>>,
    Path(option_id): Path<i64>,
    Query(params): Query<DeleteOptionParams>,
) -> Result<Json<Value>, ErrorResponse> {
    state.store.delete_option(option_id, params.user_id)?;
    Ok(Json(json!({ "message": "Option deleted successfully" })))
}
