//! Admin and audit types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the admin audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAction {
    pub id: i64,
    pub admin_id: i64,
    /// Action type, e.g. "role_change", "content_delete", "poll_close"
    pub action_type: String,
    /// Target entity type, e.g. "user", "poll"
    pub target_type: String,
    pub target_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit entry enriched with the acting admin's username
#[derive(Debug, Clone, Serialize)]
pub struct AdminActionView {
    pub id: i64,
    pub admin_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    pub action_type: String,
    pub target_type: String,
    pub target_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Role change request body
#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdate {
    /// "user" or "admin"
    pub role: String,
}

/// Per-user statistics for the admin user list
#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub polls_created: usize,
    pub total_votes: usize,
}

/// Platform-wide counters
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_polls: usize,
    pub total_votes: usize,
}
