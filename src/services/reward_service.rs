//! Domain service for the reward cascade.
//!
//! Every qualifying user action funnels through here: experience grants,
//! level-ups, achievement unlocks (which grant experience of their own),
//! and the activity trail describing all of it.

use serde::Serialize;
use thiserror::Error;

use crate::models::{ActionType, MetricType};

/// Errors specific to reward operations.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid experience delta: {0}")]
    InvalidDelta(i32),

    #[error("Experience update contention for user {0}")]
    UpdateContention(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RewardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RewardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// An achievement unlocked during a cascade.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub exp_reward: i32,
}

/// Net result of a cascade run: the user's final progression plus
/// everything that happened along the way.
#[derive(Debug, Clone, Serialize)]
pub struct RewardOutcome {
    /// Total experience granted, including achievement rewards.
    pub exp_granted: i32,
    pub level: i32,
    pub exp: i32,
    pub leveled_up: bool,
    pub levels_gained: i32,
    pub unlocked: Vec<UnlockedAchievement>,
}

/// Per-achievement progress for the read-only progress endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementProgress {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub exp_reward: i32,
    pub requirement_type: String,
    pub requirement_value: i32,
    pub current_value: i32,
    /// 0..=100
    pub progress: i32,
    pub unlocked: bool,
}

/// Domain service trait for experience, achievements, and activity.
#[async_trait::async_trait]
pub trait RewardService: Send + Sync {
    /// Grants experience and runs the full cascade: level-ups re-evaluate
    /// `level_reached` achievements, whose rewards feed back into the
    /// ledger until the queue drains.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidDelta`] for negative deltas and
    /// [`RewardError::UpdateContention`] when the guarded update loses to
    /// concurrent writers too many times.
    async fn grant_experience(
        &self,
        user_id: i32,
        delta: i32,
        reason: &str,
    ) -> Result<RewardOutcome, RewardError>;

    /// Unlocks every not-yet-unlocked achievement of `metric` whose
    /// requirement `value` now meets, granting their experience rewards.
    ///
    /// Idempotent: a second call with the same or a smaller value returns
    /// an empty list.
    async fn evaluate_achievements(
        &self,
        user_id: i32,
        metric: MetricType,
        value: i32,
    ) -> Result<Vec<UnlockedAchievement>, RewardError>;

    /// Read-only progress across all achievements for a user.
    async fn achievement_progress(
        &self,
        user_id: i32,
    ) -> Result<Vec<AchievementProgress>, RewardError>;

    /// Appends an activity entry. Best-effort: failures are logged and
    /// swallowed, never propagated. History is diagnostic, not
    /// authoritative.
    async fn record_activity(&self, user_id: i32, action: ActionType, details: serde_json::Value);
}
