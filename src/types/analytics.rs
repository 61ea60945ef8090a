//! Analytics aggregation types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Votes and new polls for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteTrendPoint {
    pub date: NaiveDate,
    pub votes: usize,
    pub polls: usize,
}

/// One entry in the merged activity feed (votes, likes, poll creations)
#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    /// Synthetic id, e.g. "vote_12" or "created_3"
    pub id: String,
    /// "vote", "like" or "created"
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: i64,
    pub username: String,
    pub poll_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Paginated activity feed
#[derive(Debug, Clone, Serialize)]
pub struct ActivityFeed {
    pub activities: Vec<ActivityItem>,
    pub total: usize,
}

/// Platform engagement summary
#[derive(Debug, Clone, Serialize)]
pub struct EngagementMetrics {
    pub total_polls: usize,
    pub active_polls: usize,
    pub closed_polls: usize,
    pub total_votes: usize,
    pub total_likes: usize,
    pub avg_votes_per_poll: f64,
    pub avg_options_per_poll: f64,
    pub participation_rate: f64,
}

/// Everything the analytics dashboard needs in one response
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsDashboard {
    pub metrics: EngagementMetrics,
    pub vote_trends: Vec<VoteTrendPoint>,
    pub recent_activities: Vec<ActivityItem>,
}

/// A poll ranked by engagement
#[derive(Debug, Clone, Serialize)]
pub struct PollEngagement {
    pub poll_id: i64,
    pub title: String,
    pub votes: usize,
    pub likes: usize,
    /// (votes + likes) per age, scaled and capped at 100
    pub engagement_rate: f64,
    pub created_at: DateTime<Utc>,
}

/// Top polls by engagement rate
#[derive(Debug, Clone, Serialize)]
pub struct TopPolls {
    pub polls: Vec<PollEngagement>,
}
