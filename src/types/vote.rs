//! Vote types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cast vote; one per user per poll, changeable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub poll_id: i64,
    pub option_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Vote request body
#[derive(Debug, Clone, Deserialize)]
pub struct VoteCreate {
    pub poll_id: i64,
    pub option_id: i64,
}
