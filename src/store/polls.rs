//! Poll and option CRUD

use chrono::{Duration, Utc};

use crate::types::{OptionCreate, OptionDetail, Poll, PollCreate, PollDetail, PollOption, PollUpdate};

use super::{PollStore, StoreData, StoreError, StoreResult};

/// Build the poll read model: options with vote counts, totals, and the
/// viewer's own vote/like flags
fn build_detail(data: &StoreData, poll: &Poll, viewer: Option<i64>) -> PollDetail {
    let options: Vec<OptionDetail> = data
        .options
        .iter()
        .filter(|o| o.poll_id == poll.id)
        .map(|o| OptionDetail {
            id: o.id,
            text: o.text.clone(),
            poll_id: o.poll_id,
            created_at: o.created_at,
            vote_count: data.votes.iter().filter(|v| v.option_id == o.id).count(),
        })
        .collect();

    let total_votes = data.votes.iter().filter(|v| v.poll_id == poll.id).count();
    let total_likes = data.likes.iter().filter(|l| l.poll_id == poll.id).count();

    let (user_voted, user_liked) = match viewer {
        Some(user_id) => (
            data.votes
                .iter()
                .any(|v| v.poll_id == poll.id && v.user_id == user_id),
            data.likes
                .iter()
                .any(|l| l.poll_id == poll.id && l.user_id == user_id),
        ),
        None => (false, false),
    };

    let creator_username = data
        .users
        .iter()
        .find(|u| u.id == poll.creator_id)
        .map(|u| u.username.clone());

    PollDetail {
        id: poll.id,
        title: poll.title.clone(),
        description: poll.description.clone(),
        creator_id: poll.creator_id,
        creator_username,
        is_active: poll.is_active,
        closes_at: poll.closes_at,
        created_at: poll.created_at,
        updated_at: poll.updated_at,
        options,
        total_votes,
        total_likes,
        user_voted,
        user_liked,
    }
}

/// Close the poll if its scheduled end has passed. Returns true if the
/// poll state changed.
fn close_if_expired(poll: &mut Poll) -> bool {
    let now = Utc::now();
    if poll.is_active && poll.closes_at.is_some_and(|t| t <= now) {
        poll.is_active = false;
        poll.updated_at = now;
        return true;
    }
    false
}

impl PollStore {
    /// Create a poll together with its options
    ///
    /// `duration_minutes`, when positive, overrides `closes_at` with a
    /// deadline relative to now.
    pub fn create_poll(&self, creator_id: i64, req: PollCreate) -> StoreResult<PollDetail> {
        if req.options.is_empty() {
            return Err(StoreError::Invalid(
                "Poll requires at least one option".to_string(),
            ));
        }

        let mut data = self.data.write();
        if !data.users.iter().any(|u| u.id == creator_id) {
            return Err(StoreError::NotFound("User"));
        }

        let now = Utc::now();
        let closes_at = match req.duration_minutes {
            Some(minutes) if minutes > 0 => Some(now + Duration::minutes(minutes)),
            _ => req.closes_at,
        };

        let poll = Poll {
            id: data.counters.next_poll(),
            title: req.title,
            description: req.description,
            creator_id,
            is_active: true,
            closes_at,
            created_at: now,
            updated_at: now,
        };
        let poll_id = poll.id;
        data.polls.push(poll.clone());

        for text in req.options {
            let option = PollOption {
                id: data.counters.next_option(),
                text,
                poll_id,
                created_at: now,
            };
            data.options.push(option);
        }

        self.persist(&data)?;
        Ok(build_detail(&data, &poll, Some(creator_id)))
    }

    /// List polls with pagination, each with stats for the given viewer
    pub fn list_polls(
        &self,
        skip: usize,
        limit: usize,
        viewer: Option<i64>,
    ) -> StoreResult<Vec<PollDetail>> {
        let mut data = self.data.write();

        let mut changed = false;
        for poll in data.polls.iter_mut() {
            changed |= close_if_expired(poll);
        }
        if changed {
            self.persist(&data)?;
        }

        Ok(data
            .polls
            .iter()
            .skip(skip)
            .take(limit)
            .map(|p| build_detail(&data, p, viewer))
            .collect())
    }

    /// Fetch one poll with stats, auto-closing it if its deadline passed
    pub fn poll_detail(&self, poll_id: i64, viewer: Option<i64>) -> StoreResult<PollDetail> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        let changed = close_if_expired(poll);
        let poll = poll.clone();

        if changed {
            self.persist(&data)?;
        }
        Ok(build_detail(&data, &poll, viewer))
    }

    /// Apply a partial update; only the creator may modify a poll
    pub fn update_poll(
        &self,
        poll_id: i64,
        user_id: i64,
        patch: PollUpdate,
    ) -> StoreResult<PollDetail> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        if poll.creator_id != user_id {
            return Err(StoreError::Forbidden(
                "Not authorized to update this poll".to_string(),
            ));
        }

        if let Some(title) = patch.title {
            poll.title = title;
        }
        if let Some(description) = patch.description {
            poll.description = Some(description);
        }
        if let Some(is_active) = patch.is_active {
            poll.is_active = is_active;
        }
        if let Some(closes_at) = patch.closes_at {
            poll.closes_at = Some(closes_at);
        }
        poll.updated_at = Utc::now();
        let poll = poll.clone();

        self.persist(&data)?;
        Ok(build_detail(&data, &poll, Some(user_id)))
    }

    /// Close a poll early; only the creator may close it. Closing an
    /// already-closed poll is a no-op.
    ///
    /// Returns the detail and whether the poll actually transitioned to
    /// closed (callers broadcast only on a real transition).
    pub fn close_poll(&self, poll_id: i64, user_id: i64) -> StoreResult<(PollDetail, bool)> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        if poll.creator_id != user_id {
            return Err(StoreError::Forbidden(
                "Not authorized to close this poll".to_string(),
            ));
        }

        let transitioned = poll.is_active;
        if transitioned {
            poll.is_active = false;
            poll.updated_at = Utc::now();
        }
        let poll = poll.clone();

        if transitioned {
            self.persist(&data)?;
        }
        Ok((build_detail(&data, &poll, Some(user_id)), transitioned))
    }

    /// Delete a poll and cascade to its options, votes and likes; only the
    /// creator may delete it
    pub fn delete_poll(&self, poll_id: i64, user_id: i64) -> StoreResult<()> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        if poll.creator_id != user_id {
            return Err(StoreError::Forbidden(
                "Not authorized to delete this poll".to_string(),
            ));
        }

        data.polls.retain(|p| p.id != poll_id);
        data.options.retain(|o| o.poll_id != poll_id);
        data.votes.retain(|v| v.poll_id != poll_id);
        data.likes.retain(|l| l.poll_id != poll_id);

        self.persist(&data)?;
        Ok(())
    }

    /// Delete any poll regardless of creator; moderation path, callers
    /// must have verified admin rights
    pub fn admin_delete_poll(&self, poll_id: i64) -> StoreResult<Poll> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .cloned()
            .ok_or(StoreError::NotFound("Poll"))?;

        data.polls.retain(|p| p.id != poll_id);
        data.options.retain(|o| o.poll_id != poll_id);
        data.votes.retain(|v| v.poll_id != poll_id);
        data.likes.retain(|l| l.poll_id != poll_id);

        self.persist(&data)?;
        Ok(poll)
    }

    /// Add an option to an existing poll; only the creator may add options
    pub fn add_option(
        &self,
        poll_id: i64,
        user_id: i64,
        req: OptionCreate,
    ) -> StoreResult<OptionDetail> {
        let mut data = self.data.write();

        let poll = data
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        if poll.creator_id != user_id {
            return Err(StoreError::Forbidden(
                "Not authorized to add options to this poll".to_string(),
            ));
        }

        let option = PollOption {
            id: data.counters.next_option(),
            text: req.text,
            poll_id,
            created_at: Utc::now(),
        };
        data.options.push(option.clone());

        self.persist(&data)?;
        Ok(OptionDetail {
            id: option.id,
            text: option.text,
            poll_id: option.poll_id,
            created_at: option.created_at,
            vote_count: 0,
        })
    }

    /// All options belonging to a poll
    pub fn options_for_poll(&self, poll_id: i64) -> Vec<PollOption> {
        let data = self.data.read();
        data.options
            .iter()
            .filter(|o| o.poll_id == poll_id)
            .cloned()
            .collect()
    }

    /// Delete an option and the votes cast on it; only the poll's creator
    /// may delete options
    pub fn delete_option(&self, option_id: i64, user_id: i64) -> StoreResult<()> {
        let mut data = self.data.write();

        let option = data
            .options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or(StoreError::NotFound("Option"))?;
        let poll_id = option.poll_id;

        let poll = data
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or(StoreError::NotFound("Poll"))?;
        if poll.creator_id != user_id {
            return Err(StoreError::Forbidden(
                "Not authorized to delete this option".to_string(),
            ));
        }

        data.options.retain(|o| o.id != option_id);
        data.votes.retain(|v| v.option_id != option_id);

        self.persist(&data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserCreate;

    fn store_with_user() -> (PollStore, i64) {
        let store = PollStore::in_memory();
        let user = store
            .create_user(UserCreate {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();
        (store, user.id)
    }

    fn simple_poll(store: &PollStore, creator: i64) -> PollDetail {
        store
            .create_poll(
                creator,
                PollCreate {
                    title: "Lunch?".to_string(),
                    description: None,
                    options: vec!["Pizza".to_string(), "Sushi".to_string()],
                    duration_minutes: None,
                    closes_at: None,
                },
            )
            .unwrap()
    }

    #[test]
    fn test_create_poll_with_options() {
        let (store, alice) = store_with_user();
        let detail = simple_poll(&store, alice);

        assert!(detail.is_active);
        assert_eq!(detail.options.len(), 2);
        assert_eq!(detail.total_votes, 0);
        assert_eq!(detail.creator_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_create_poll_requires_options() {
        let (store, alice) = store_with_user();
        let err = store
            .create_poll(
                alice,
                PollCreate {
                    title: "Empty".to_string(),
                    description: None,
                    options: vec![],
                    duration_minutes: None,
                    closes_at: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_duration_minutes_sets_deadline() {
        let (store, alice) = store_with_user();
        let detail = store
            .create_poll(
                alice,
                PollCreate {
                    title: "Timed".to_string(),
                    description: None,
                    options: vec!["A".to_string()],
                    duration_minutes: Some(30),
                    closes_at: None,
                },
            )
            .unwrap();
        assert!(detail.closes_at.is_some());
    }

    #[test]
    fn test_expired_poll_is_closed_on_read() {
        let (store, alice) = store_with_user();
        let detail = store
            .create_poll(
                alice,
                PollCreate {
                    title: "Expired".to_string(),
                    description: None,
                    options: vec!["A".to_string()],
                    duration_minutes: None,
                    closes_at: Some(Utc::now() - Duration::minutes(5)),
                },
            )
            .unwrap();
        assert!(detail.is_active);

        let refreshed = store.poll_detail(detail.id, None).unwrap();
        assert!(!refreshed.is_active);
    }

    #[test]
    fn test_update_requires_creator() {
        let (store, alice) = store_with_user();
        let bob = store
            .create_user(UserCreate {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();
        let poll = simple_poll(&store, alice);

        let err = store
            .update_poll(poll.id, bob.id, PollUpdate::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (store, alice) = store_with_user();
        let poll = simple_poll(&store, alice);

        let (detail, transitioned) = store.close_poll(poll.id, alice).unwrap();
        assert!(!detail.is_active);
        assert!(transitioned);

        let (_, transitioned) = store.close_poll(poll.id, alice).unwrap();
        assert!(!transitioned);
    }

    #[test]
    fn test_delete_cascades() {
        let (store, alice) = store_with_user();
        let poll = simple_poll(&store, alice);
        store
            .cast_vote(alice, poll.id, poll.options[0].id)
            .unwrap();
        store.toggle_like(alice, poll.id).unwrap();

        store.delete_poll(poll.id, alice).unwrap();

        let data = store.data.read();
        assert!(data.polls.is_empty());
        assert!(data.options.is_empty());
        assert!(data.votes.is_empty());
        assert!(data.likes.is_empty());
    }

    #[test]
    fn test_delete_option_removes_its_votes() {
        let (store, alice) = store_with_user();
        let poll = simple_poll(&store, alice);
        let option_id = poll.options[0].id;
        store.cast_vote(alice, poll.id, option_id).unwrap();

        store.delete_option(option_id, alice).unwrap();

        let data = store.data.read();
        assert_eq!(data.options.len(), 1);
        assert!(data.votes.is_empty());
    }
}
