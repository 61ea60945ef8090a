//! Analytics aggregation over the store
//!
//! Straightforward full scans; the dataset is room-sized, not
//! internet-scale.

use chrono::{Duration, Utc};

use crate::types::{
    ActivityFeed, ActivityItem, AnalyticsDashboard, EngagementMetrics, PollEngagement, TopPolls,
    VoteTrendPoint,
};

use super::{PollStore, StoreData};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn username_of(data: &StoreData, user_id: i64) -> String {
    data.users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.username.clone())
        .unwrap_or_else(|| format!("user_{}", user_id))
}

fn poll_title_of(data: &StoreData, poll_id: i64) -> Option<String> {
    data.polls
        .iter()
        .find(|p| p.id == poll_id)
        .map(|p| p.title.clone())
}

fn compute_metrics(data: &StoreData) -> EngagementMetrics {
    let total_polls = data.polls.len();
    let active_polls = data.polls.iter().filter(|p| p.is_active).count();
    let total_votes = data.votes.len();
    let total_likes = data.likes.len();
    let total_options = data.options.len();

    let (avg_votes, avg_options, participation) = if total_polls > 0 {
        let polls = total_polls as f64;
        (
            total_votes as f64 / polls,
            total_options as f64 / polls,
            // Participation relative to a nominal 100 voters per poll
            (total_votes as f64 / (polls * 100.0)) * 100.0,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    EngagementMetrics {
        total_polls,
        active_polls,
        closed_polls: total_polls - active_polls,
        total_votes,
        total_likes,
        avg_votes_per_poll: round2(avg_votes),
        avg_options_per_poll: round2(avg_options),
        participation_rate: round2(participation),
    }
}

fn compute_vote_trends(data: &StoreData, days: i64) -> Vec<VoteTrendPoint> {
    let today = Utc::now().date_naive();
    (0..days)
        .map(|i| {
            let date = today - Duration::days(i);
            VoteTrendPoint {
                date,
                votes: data
                    .votes
                    .iter()
                    .filter(|v| v.created_at.date_naive() == date)
                    .count(),
                polls: data
                    .polls
                    .iter()
                    .filter(|p| p.created_at.date_naive() == date)
                    .count(),
            }
        })
        .collect()
}

fn compute_activities(data: &StoreData, limit: usize, offset: usize) -> Vec<ActivityItem> {
    let mut activities: Vec<ActivityItem> = Vec::new();

    for vote in &data.votes {
        activities.push(ActivityItem {
            id: format!("vote_{}", vote.id),
            kind: "vote".to_string(),
            user_id: vote.user_id,
            username: username_of(data, vote.user_id),
            poll_id: vote.poll_id,
            poll_title: poll_title_of(data, vote.poll_id),
            timestamp: vote.created_at,
        });
    }
    for like in &data.likes {
        activities.push(ActivityItem {
            id: format!("like_{}", like.id),
            kind: "like".to_string(),
            user_id: like.user_id,
            username: username_of(data, like.user_id),
            poll_id: like.poll_id,
            poll_title: poll_title_of(data, like.poll_id),
            timestamp: like.created_at,
        });
    }
    for poll in &data.polls {
        activities.push(ActivityItem {
            id: format!("created_{}", poll.id),
            kind: "created".to_string(),
            user_id: poll.creator_id,
            username: username_of(data, poll.creator_id),
            poll_id: poll.id,
            poll_title: Some(poll.title.clone()),
            timestamp: poll.created_at,
        });
    }

    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.into_iter().skip(offset).take(limit).collect()
}

impl PollStore {
    /// Platform engagement summary
    pub fn engagement_metrics(&self) -> EngagementMetrics {
        compute_metrics(&self.data.read())
    }

    /// Daily votes and new polls for the last `days` days, newest first
    pub fn vote_trends(&self, days: i64) -> Vec<VoteTrendPoint> {
        compute_vote_trends(&self.data.read(), days)
    }

    /// Merged feed of recent votes, likes and poll creations
    pub fn recent_activities(&self, limit: usize, offset: usize) -> ActivityFeed {
        let data = self.data.read();
        let total = data.votes.len() + data.likes.len() + data.polls.len();
        ActivityFeed {
            activities: compute_activities(&data, limit, offset),
            total,
        }
    }

    /// Top 10 polls ranked by engagement rate
    ///
    /// Engagement rate is (votes + likes) per day of age, scaled to a
    /// per-10-days figure and capped at 100.
    pub fn top_polls(&self) -> TopPolls {
        let data = self.data.read();
        let now = Utc::now();

        let mut polls: Vec<PollEngagement> = data
            .polls
            .iter()
            .map(|poll| {
                let votes = data.votes.iter().filter(|v| v.poll_id == poll.id).count();
                let likes = data.likes.iter().filter(|l| l.poll_id == poll.id).count();

                let age_days = (now - poll.created_at).num_days().max(1);
                let rate = ((votes + likes) as f64 / age_days as f64) * 10.0;

                PollEngagement {
                    poll_id: poll.id,
                    title: poll.title.clone(),
                    votes,
                    likes,
                    engagement_rate: (rate.min(100.0) * 10.0).round() / 10.0,
                    created_at: poll.created_at,
                }
            })
            .collect();

        polls.sort_by(|a, b| {
            b.engagement_rate
                .partial_cmp(&a.engagement_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        polls.truncate(10);

        TopPolls { polls }
    }

    /// Everything the dashboard renders in one call
    pub fn analytics_dashboard(&self) -> AnalyticsDashboard {
        let data = self.data.read();
        AnalyticsDashboard {
            metrics: compute_metrics(&data),
            vote_trends: compute_vote_trends(&data, 7),
            recent_activities: compute_activities(&data, 20, 0),
        }
    }
}
