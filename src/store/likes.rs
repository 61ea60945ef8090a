//! Like operations

use chrono::Utc;

use crate::types::Like;

use super::{PollStore, StoreError, StoreResult};

/// Result of a like toggle
#[derive(Debug, Clone)]
pub enum LikeOutcome {
    /// A like was added
    Liked(Like),
    /// An existing like was removed
    Removed,
}

impl PollStore {
    /// Toggle a like: add one if the user has none on this poll, remove
    /// the existing one otherwise
    pub fn toggle_like(&self, user_id: i64, poll_id: i64) -> StoreResult<LikeOutcome> {
        let mut data = self.data.write();

        if !data.polls.iter().any(|p| p.id == poll_id) {
            return Err(StoreError::NotFound("Poll"));
        }

        let existing = data
            .likes
            .iter()
            .position(|l| l.user_id == user_id && l.poll_id == poll_id);
        if let Some(index) = existing {
            data.likes.remove(index);
            self.persist(&data)?;
            return Ok(LikeOutcome::Removed);
        }

        let like = Like {
            id: data.counters.next_like(),
            user_id,
            poll_id,
            created_at: Utc::now(),
        };
        data.likes.push(like.clone());

        self.persist(&data)?;
        Ok(LikeOutcome::Liked(like))
    }

    /// All likes on a poll
    pub fn likes_for_poll(&self, poll_id: i64) -> Vec<Like> {
        let data = self.data.read();
        data.likes
            .iter()
            .filter(|l| l.poll_id == poll_id)
            .cloned()
            .collect()
    }

    /// All likes by a user
    pub fn likes_by_user(&self, user_id: i64) -> Vec<Like> {
        let data = self.data.read();
        data.likes
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect()
    }
}
