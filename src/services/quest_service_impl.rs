//! `SeaORM` implementation of the `QuestService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::entities::{quests, user_quests};
use crate::game::{BattleAction, simulate_battle};
use crate::models::{ActionType, MetricType, QuestInfo};
use crate::services::quest_service::{QuestAttempt, QuestError, QuestService};
use crate::services::reward_service::RewardService;

pub struct SeaOrmQuestService {
    store: Store,
    rewards: Arc<dyn RewardService>,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmQuestService {
    #[must_use]
    pub fn new(
        store: Store,
        rewards: Arc<dyn RewardService>,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            rewards,
            event_bus,
        }
    }
}

fn quest_info(model: &quests::Model) -> Result<QuestInfo, QuestError> {
    let difficulty = model
        .difficulty
        .parse()
        .map_err(|e: anyhow::Error| QuestError::Internal(e.to_string()))?;

    Ok(QuestInfo {
        id: model.id,
        boss_name: model.boss_name.clone(),
        floor_number: model.floor_number,
        difficulty,
        exp_reward: model.exp_reward,
        health_points: model.health_points,
    })
}

#[async_trait]
impl QuestService for SeaOrmQuestService {
    async fn list(&self) -> Result<Vec<quests::Model>, QuestError> {
        let quests = self.store.list_active_quests().await?;
        Ok(quests)
    }

    async fn completions(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_quests::Model, Option<quests::Model>)>, QuestError> {
        let completions = self.store.quest_completions_by_user(user_id).await?;
        Ok(completions)
    }

    async fn attempt(
        &self,
        user_id: i32,
        quest_id: i32,
        action: BattleAction,
    ) -> Result<QuestAttempt, QuestError> {
        let quest = self
            .store
            .get_quest(quest_id)
            .await?
            .ok_or(QuestError::NotFound)?;

        if !quest.active {
            return Err(QuestError::Inactive);
        }

        // Cleared quests cannot be re-run; check before any dice roll.
        if self.store.quest_completed(user_id, quest_id).await? {
            return Err(QuestError::AlreadyCompleted);
        }

        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(QuestError::UserNotFound)?;

        let info = quest_info(&quest)?;

        let battle = {
            let mut rng = rand::rng();
            simulate_battle(&mut rng, user.level, &info, action)
        };

        if !battle.success {
            self.rewards
                .record_activity(
                    user_id,
                    ActionType::QuestFailed,
                    serde_json::json!({
                        "quest_id": quest.id,
                        "boss_name": quest.boss_name,
                        "damage_dealt": battle.damage_dealt,
                        "turns": battle.turns,
                    }),
                )
                .await;

            return Ok(QuestAttempt {
                battle,
                exp_gained: 0,
                level: user.level,
                leveled_up: false,
                unlocked: Vec::new(),
            });
        }

        // The unique (user, quest) row is the completion authority; a
        // concurrent winning attempt makes this insert a conflict.
        self.store
            .insert_quest_completion(user_id, quest_id, battle.damage_dealt)
            .await?
            .ok_or(QuestError::AlreadyCompleted)?;

        self.rewards
            .record_activity(
                user_id,
                ActionType::QuestCompleted,
                serde_json::json!({
                    "quest_id": quest.id,
                    "boss_name": quest.boss_name,
                    "exp_reward": quest.exp_reward,
                    "damage_dealt": battle.damage_dealt,
                    "turns": battle.turns,
                }),
            )
            .await;

        let reward = self
            .rewards
            .grant_experience(user_id, quest.exp_reward, "quest completed")
            .await?;

        let completed = self.store.count_quests_completed_by(user_id).await?;
        let mut unlocked = self
            .rewards
            .evaluate_achievements(
                user_id,
                MetricType::QuestsCompleted,
                i32::try_from(completed).unwrap_or(i32::MAX),
            )
            .await?;

        let mut all_unlocked = reward.unlocked.clone();
        all_unlocked.append(&mut unlocked);

        let _ = self.event_bus.send(NotificationEvent::QuestCompleted {
            quest_id: quest.id,
            boss_name: quest.boss_name.clone(),
            username: user.username,
            damage_dealt: battle.damage_dealt,
        });

        // Achievement rewards may have bumped the level past the quest
        // grant itself; report the freshest numbers.
        let final_user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(QuestError::UserNotFound)?;

        Ok(QuestAttempt {
            battle,
            exp_gained: quest.exp_reward,
            level: final_user.level,
            leveled_up: final_user.level > user.level,
            unlocked: all_unlocked,
        })
    }
}
