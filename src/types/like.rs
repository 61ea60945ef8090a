//! Like types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A like; one per user per poll, toggleable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub poll_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Like toggle request body
#[derive(Debug, Clone, Deserialize)]
pub struct LikeCreate {
    pub poll_id: i64,
}
