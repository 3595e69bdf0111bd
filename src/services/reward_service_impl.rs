//! `SeaORM` implementation of the `RewardService` trait.
//!
//! The cascade is an explicit work queue rather than nested recursion:
//! each drained grant may enqueue further grants (achievement rewards),
//! and each level-up re-evaluates the `level_reached` metric. Unlocks are
//! monotonic and finite, so the queue always drains.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::warn;

use crate::constants::rewards::EXP_UPDATE_RETRIES;
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::game::{apply_experience, title_for_level};
use crate::models::{ActionType, MetricType};
use crate::services::reward_service::{
    AchievementProgress, RewardError, RewardOutcome, RewardService, UnlockedAchievement,
};

struct PendingGrant {
    delta: i32,
    reason: String,
}

pub struct SeaOrmRewardService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmRewardService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    /// Applies one grant through the guarded update, retrying while other
    /// writers move the row underneath us.
    async fn apply_grant(
        &self,
        user_id: i32,
        delta: i32,
    ) -> Result<crate::game::ExperienceGain, RewardError> {
        if delta < 0 {
            return Err(RewardError::InvalidDelta(delta));
        }

        for _ in 0..EXP_UPDATE_RETRIES {
            let user = self
                .store
                .get_user_by_id(user_id)
                .await?
                .ok_or(RewardError::UserNotFound)?;

            let gain = apply_experience(user.level, user.exp, delta)
                .map_err(|e| RewardError::Internal(e.to_string()))?;

            let updated = self
                .store
                .update_experience_guarded(user_id, user.level, user.exp, gain.level, gain.exp)
                .await?;

            if updated {
                return Ok(gain);
            }
        }

        Err(RewardError::UpdateContention(user_id))
    }

    /// Unlocks achievements for one metric without granting their rewards;
    /// the caller queues those.
    async fn unlock_for_metric(
        &self,
        user_id: i32,
        metric: MetricType,
        value: i32,
    ) -> Result<Vec<UnlockedAchievement>, RewardError> {
        let candidates = self
            .store
            .unlockable_achievements(user_id, metric, value)
            .await?;

        let mut unlocked = Vec::new();

        for achievement in candidates {
            // A concurrent evaluation may have inserted the row already;
            // the unique constraint makes that a no-op here.
            if !self
                .store
                .unlock_achievement(user_id, achievement.id)
                .await?
            {
                continue;
            }

            self.record_activity(
                user_id,
                ActionType::AchievementUnlocked,
                serde_json::json!({
                    "achievement_name": achievement.name,
                    "exp_reward": achievement.exp_reward,
                }),
            )
            .await;

            self.notify(user_id, &achievement.name, achievement.exp_reward)
                .await;

            unlocked.push(UnlockedAchievement {
                id: achievement.id,
                name: achievement.name,
                description: achievement.description,
                exp_reward: achievement.exp_reward,
            });
        }

        Ok(unlocked)
    }

    async fn notify(&self, user_id: i32, achievement: &str, exp_reward: i32) {
        let username = match self.store.get_user_by_id(user_id).await {
            Ok(Some(user)) => user.username,
            _ => return,
        };

        let _ = self.event_bus.send(NotificationEvent::AchievementUnlocked {
            user_id,
            username,
            achievement: achievement.to_string(),
            exp_reward,
        });
    }

    /// Drains the grant queue to completion and reports the net effect.
    async fn run_cascade(
        &self,
        user_id: i32,
        initial: Vec<PendingGrant>,
    ) -> Result<RewardOutcome, RewardError> {
        let mut queue: VecDeque<PendingGrant> = initial.into();
        let mut seen_unlocks: HashSet<i32> = HashSet::new();

        let mut exp_granted = 0;
        let mut levels_gained = 0;
        let mut unlocked = Vec::new();

        let mut final_level;
        let mut final_exp;

        {
            let user = self
                .store
                .get_user_by_id(user_id)
                .await?
                .ok_or(RewardError::UserNotFound)?;
            final_level = user.level;
            final_exp = user.exp;
        }

        while let Some(grant) = queue.pop_front() {
            let gain = self.apply_grant(user_id, grant.delta).await?;

            exp_granted += grant.delta;
            final_level = gain.level;
            final_exp = gain.exp;

            if !gain.leveled_up {
                continue;
            }

            levels_gained += gain.levels_gained;

            let old_level = gain.level - gain.levels_gained;
            self.record_activity(
                user_id,
                ActionType::LevelUp,
                serde_json::json!({
                    "old_level": old_level,
                    "new_level": gain.level,
                    "title": title_for_level(gain.level),
                    "reason": grant.reason,
                }),
            )
            .await;

            if let Ok(Some(user)) = self.store.get_user_by_id(user_id).await {
                let _ = self.event_bus.send(NotificationEvent::LevelUp {
                    user_id,
                    username: user.username,
                    old_level,
                    new_level: gain.level,
                });
            }

            // A new level may clear `level_reached` requirements; their
            // rewards join the queue and are granted in order.
            let newly = self
                .unlock_for_metric(user_id, MetricType::LevelReached, gain.level)
                .await?;

            for achievement in newly {
                if !seen_unlocks.insert(achievement.id) {
                    continue;
                }
                queue.push_back(PendingGrant {
                    delta: achievement.exp_reward,
                    reason: format!("achievement: {}", achievement.name),
                });
                unlocked.push(achievement);
            }
        }

        Ok(RewardOutcome {
            exp_granted,
            level: final_level,
            exp: final_exp,
            leveled_up: levels_gained > 0,
            levels_gained,
            unlocked,
        })
    }

    async fn metric_value(&self, user_id: i32, metric: MetricType) -> Result<i32, RewardError> {
        let value = match metric {
            MetricType::VulnerabilitiesReported => {
                self.store.count_vulnerabilities_reported_by(user_id).await?
            }
            MetricType::VulnerabilitiesResolved => {
                self.store.count_vulnerabilities_resolved_by(user_id).await?
            }
            MetricType::QuestsCompleted => self.store.count_quests_completed_by(user_id).await?,
            MetricType::LevelReached => {
                let user = self
                    .store
                    .get_user_by_id(user_id)
                    .await?
                    .ok_or(RewardError::UserNotFound)?;
                return Ok(user.level);
            }
            MetricType::ReviewsGiven => self.store.count_reviews_by_user(user_id).await?,
        };

        Ok(i32::try_from(value).unwrap_or(i32::MAX))
    }
}

#[async_trait]
impl RewardService for SeaOrmRewardService {
    async fn grant_experience(
        &self,
        user_id: i32,
        delta: i32,
        reason: &str,
    ) -> Result<RewardOutcome, RewardError> {
        if delta < 0 {
            return Err(RewardError::InvalidDelta(delta));
        }

        self.run_cascade(
            user_id,
            vec![PendingGrant {
                delta,
                reason: reason.to_string(),
            }],
        )
        .await
    }

    async fn evaluate_achievements(
        &self,
        user_id: i32,
        metric: MetricType,
        value: i32,
    ) -> Result<Vec<UnlockedAchievement>, RewardError> {
        let newly = self.unlock_for_metric(user_id, metric, value).await?;

        if newly.is_empty() {
            return Ok(newly);
        }

        let grants = newly
            .iter()
            .map(|a| PendingGrant {
                delta: a.exp_reward,
                reason: format!("achievement: {}", a.name),
            })
            .collect();

        let outcome = self.run_cascade(user_id, grants).await?;

        let mut all = newly;
        all.extend(outcome.unlocked);
        Ok(all)
    }

    async fn achievement_progress(
        &self,
        user_id: i32,
    ) -> Result<Vec<AchievementProgress>, RewardError> {
        let mut values = std::collections::HashMap::new();
        for metric in MetricType::ALL {
            values.insert(metric, self.metric_value(user_id, metric).await?);
        }

        let unlocked_ids: HashSet<i32> = self
            .store
            .achievements_by_user(user_id)
            .await?
            .into_iter()
            .map(|(ua, _)| ua.achievement_id)
            .collect();

        let achievements = self.store.list_achievements().await?;

        let mut out = Vec::with_capacity(achievements.len());
        for achievement in achievements {
            let metric: MetricType = achievement
                .requirement_type
                .parse()
                .map_err(|e: anyhow::Error| RewardError::Internal(e.to_string()))?;

            if achievement.requirement_value <= 0 {
                return Err(RewardError::Internal(format!(
                    "Achievement {} has non-positive requirement",
                    achievement.id
                )));
            }

            let current = *values.get(&metric).unwrap_or(&0);
            let progress = (i64::from(current) * 100 / i64::from(achievement.requirement_value))
                .clamp(0, 100);

            out.push(AchievementProgress {
                id: achievement.id,
                name: achievement.name,
                description: achievement.description,
                exp_reward: achievement.exp_reward,
                requirement_type: achievement.requirement_type,
                requirement_value: achievement.requirement_value,
                current_value: current,
                progress: i32::try_from(progress).unwrap_or(100),
                unlocked: unlocked_ids.contains(&achievement.id),
            });
        }

        Ok(out)
    }

    async fn record_activity(&self, user_id: i32, action: ActionType, details: serde_json::Value) {
        if let Err(e) = self.store.log_activity(user_id, action, &details).await {
            warn!("Failed to record {action} activity for user {user_id}: {e}");
        }
    }
}
