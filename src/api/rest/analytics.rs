//! Analytics endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::types::{ActivityFeed, AnalyticsDashboard, EngagementMetrics, TopPolls, VoteTrendPoint};

/// GET /analytics/dashboard - Everything the dashboard renders
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<AnalyticsDashboard> {
    Json(state.store.analytics_dashboard())
}

/// GET /analytics/metrics - Engagement summary
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<EngagementMetrics> {
    Json(state.store.engagement_metrics())
}

/// Query parameters for vote trends
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

/// GET /analytics/vote-trends - Daily votes and new polls
pub async fn get_vote_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> Json<serde_json::Value> {
    let trends: Vec<VoteTrendPoint> = state.store.vote_trends(params.days.clamp(1, 365));
    Json(serde_json::json!({ "trends": trends }))
}

/// Query parameters for the activity feed
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    #[serde(default = "default_activity_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_activity_limit() -> usize {
    50
}

/// GET /analytics/activities - Merged recent-activity feed
pub async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivityParams>,
) -> Json<ActivityFeed> {
    Json(state.store.recent_activities(params.limit.min(200), params.offset))
}

/// GET /analytics/top-polls - Top polls by engagement rate
pub async fn get_top_polls(State(state): State<Arc<AppState>>) -> Json<TopPolls> {
    Json(state.store.top_polls())
}
