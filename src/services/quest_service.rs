//! Domain service for quest attempts.

use serde::Serialize;
use thiserror::Error;

use crate::entities::{quests, user_quests};
use crate::game::BattleOutcome;
use crate::services::reward_service::UnlockedAchievement;

/// Errors specific to quest operations.
#[derive(Debug, Error)]
pub enum QuestError {
    #[error("Quest not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Quest already completed")]
    AlreadyCompleted,

    #[error("Quest is not active")]
    Inactive,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for QuestError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for QuestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<crate::services::reward_service::RewardError> for QuestError {
    fn from(err: crate::services::reward_service::RewardError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome of one quest attempt: the battle plus any progression effects.
#[derive(Debug, Clone, Serialize)]
pub struct QuestAttempt {
    pub battle: BattleOutcome,
    pub exp_gained: i32,
    pub level: i32,
    pub leveled_up: bool,
    pub unlocked: Vec<UnlockedAchievement>,
}

/// Domain service trait for quests.
#[async_trait::async_trait]
pub trait QuestService: Send + Sync {
    async fn list(&self) -> Result<Vec<quests::Model>, QuestError>;

    async fn completions(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_quests::Model, Option<quests::Model>)>, QuestError>;

    /// Runs one battle attempt.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::AlreadyCompleted`] when a completion row
    /// already exists; the check runs before the simulator, so a cleared
    /// quest never gets a second battle.
    async fn attempt(
        &self,
        user_id: i32,
        quest_id: i32,
        action: crate::game::BattleAction,
    ) -> Result<QuestAttempt, QuestError>;
}
