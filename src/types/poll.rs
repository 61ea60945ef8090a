//! Poll and option types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A poll as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator_id: i64,
    pub is_active: bool,
    /// Scheduled close time; polls past this point are closed on read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An answer option belonging to a poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub id: i64,
    pub text: String,
    pub poll_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Poll creation request body
#[derive(Debug, Clone, Deserialize)]
pub struct PollCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Option texts; at least one is required
    pub options: Vec<String>,
    /// Convenience alternative to `closes_at`: close N minutes from now
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub closes_at: Option<DateTime<Utc>>,
}

/// Partial poll update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub closes_at: Option<DateTime<Utc>>,
}

/// Option creation request body
#[derive(Debug, Clone, Deserialize)]
pub struct OptionCreate {
    pub text: String,
}

/// An option with its current vote count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDetail {
    pub id: i64,
    pub text: String,
    pub poll_id: i64,
    pub created_at: DateTime<Utc>,
    pub vote_count: usize,
}

/// Full poll read model: poll fields plus aggregated stats and the
/// requesting viewer's own vote/like flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollDetail {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_username: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub options: Vec<OptionDetail>,
    pub total_votes: usize,
    pub total_likes: usize,
    pub user_voted: bool,
    pub user_liked: bool,
}
