//! Admin audit trail

use chrono::Utc;

use crate::types::{AdminAction, AdminActionView, PlatformStats, UserOverview};

use super::{PollStore, StoreResult};

impl PollStore {
    /// Append an entry to the admin audit trail
    pub fn log_admin_action(
        &self,
        admin_id: i64,
        action_type: &str,
        target_type: &str,
        target_id: i64,
        details: Option<serde_json::Value>,
    ) -> StoreResult<AdminAction> {
        let mut data = self.data.write();

        let action = AdminAction {
            id: data.counters.next_admin_action(),
            admin_id,
            action_type: action_type.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details,
            created_at: Utc::now(),
        };
        data.admin_actions.push(action.clone());

        self.persist(&data)?;
        Ok(action)
    }

    /// Read the audit trail, newest first, optionally filtered by admin
    pub fn admin_actions(
        &self,
        admin_id: Option<i64>,
        limit: usize,
        offset: usize,
    ) -> Vec<AdminActionView> {
        let data = self.data.read();

        let mut actions: Vec<&AdminAction> = data
            .admin_actions
            .iter()
            .filter(|a| admin_id.map_or(true, |id| a.admin_id == id))
            .collect();
        actions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        actions
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|a| AdminActionView {
                id: a.id,
                admin_id: a.admin_id,
                admin_username: data
                    .users
                    .iter()
                    .find(|u| u.id == a.admin_id)
                    .map(|u| u.username.clone()),
                action_type: a.action_type.clone(),
                target_type: a.target_type.clone(),
                target_id: a.target_id,
                details: a.details.clone(),
                created_at: a.created_at,
            })
            .collect()
    }

    /// Per-user statistics for the admin user list
    pub fn user_overviews(&self) -> Vec<UserOverview> {
        let data = self.data.read();
        data.users
            .iter()
            .map(|u| UserOverview {
                id: u.id,
                username: u.username.clone(),
                email: u.email.clone(),
                role: u.role.clone(),
                created_at: u.created_at,
                polls_created: data.polls.iter().filter(|p| p.creator_id == u.id).count(),
                total_votes: data.votes.iter().filter(|v| v.user_id == u.id).count(),
            })
            .collect()
    }

    /// Platform-wide counters
    pub fn platform_stats(&self) -> PlatformStats {
        let data = self.data.read();
        PlatformStats {
            total_users: data.users.len(),
            total_polls: data.polls.len(),
            total_votes: data.votes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserCreate;
    use serde_json::json;

    #[test]
    fn test_audit_log_filter_and_order() {
        let store = PollStore::in_memory();
        let admin = store
            .create_user(UserCreate {
                username: "root".to_string(),
                email: "root@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();

        store
            .log_admin_action(admin.id, "role_change", "user", 5, Some(json!({"new": "admin"})))
            .unwrap();
        store
            .log_admin_action(admin.id, "poll_close", "poll", 3, None)
            .unwrap();
        store
            .log_admin_action(999, "content_delete", "poll", 4, None)
            .unwrap();

        let all = store.admin_actions(None, 50, 0);
        assert_eq!(all.len(), 3);

        let filtered = store.admin_actions(Some(admin.id), 50, 0);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].admin_username.as_deref(), Some("root"));
    }

    #[test]
    fn test_platform_stats() {
        let store = PollStore::in_memory();
        store
            .create_user(UserCreate {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();

        let stats = store.platform_stats();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_polls, 0);
    }
}
