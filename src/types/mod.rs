//! Data types for the QuickPoll server
//!
//! This module contains all core domain structures plus the request and
//! response shapes used by the REST API.

mod admin;
mod analytics;
mod like;
mod poll;
mod user;
mod vote;

pub use admin::{AdminAction, AdminActionView, PlatformStats, RoleUpdate, UserOverview};
pub use analytics::{
    ActivityFeed, ActivityItem, AnalyticsDashboard, EngagementMetrics, PollEngagement, TopPolls,
    VoteTrendPoint,
};
pub use like::{Like, LikeCreate};
pub use poll::{OptionCreate, OptionDetail, Poll, PollCreate, PollDetail, PollOption, PollUpdate};
pub use user::{User, UserCreate, UserLogin, UserResponse};
pub use vote::{Vote, VoteCreate};
