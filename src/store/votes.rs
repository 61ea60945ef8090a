//! Vote operations

use chrono::Utc;

use crate::types::Vote;

use super::{PollStore, StoreError, StoreResult};

impl PollStore {
    /// Cast a vote on an active poll
    ///
    /// A user has at most one vote per poll; voting again moves the
    /// existing vote to the new option.
    pub fn cast_vote(&self, user_id: i64, poll_id: i64, option_id: i64) -> StoreResult<Vote> {
        let mut data = self.data.write();

        let poll_active = data
            .polls
            .iter()
            .any(|p| p.id == poll_id && p.is_active);
        if !poll_active {
            return Err(StoreError::NotFound("Poll"));
        }

        let option_matches = data
            .options
            .iter()
            .any(|o| o.id == option_id && o.poll_id == poll_id);
        if !option_matches {
            return Err(StoreError::NotFound("Option"));
        }

        if let Some(existing) = data
            .votes
            .iter_mut()
            .find(|v| v.user_id == user_id && v.poll_id == poll_id)
        {
            existing.option_id = option_id;
            let vote = existing.clone();
            self.persist(&data)?;
            return Ok(vote);
        }

        let vote = Vote {
            id: data.counters.next_vote(),
            user_id,
            poll_id,
            option_id,
            created_at: Utc::now(),
        };
        data.votes.push(vote.clone());

        self.persist(&data)?;
        Ok(vote)
    }

    /// All votes cast on a poll
    pub fn votes_for_poll(&self, poll_id: i64) -> Vec<Vote> {
        let data = self.data.read();
        data.votes
            .iter()
            .filter(|v| v.poll_id == poll_id)
            .cloned()
            .collect()
    }

    /// Retract a vote; only its owner may delete it
    pub fn delete_vote(&self, vote_id: i64, user_id: i64) -> StoreResult<()> {
        let mut data = self.data.write();

        let exists = data
            .votes
            .iter()
            .any(|v| v.id == vote_id && v.user_id == user_id);
        if !exists {
            return Err(StoreError::NotFound("Vote"));
        }

        data.votes.retain(|v| v.id != vote_id);
        self.persist(&data)?;
        Ok(())
    }
}
