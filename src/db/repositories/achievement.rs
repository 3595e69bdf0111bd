use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::entities::{achievements, user_achievements};
use crate::models::MetricType;

pub struct AchievementRepository {
    conn: DatabaseConnection,
}

impl AchievementRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn all(&self) -> Result<Vec<achievements::Model>> {
        let items = achievements::Entity::find()
            .order_by_asc(achievements::Column::RequirementType)
            .order_by_asc(achievements::Column::RequirementValue)
            .all(&self.conn)
            .await
            .context("Failed to list achievements")?;

        Ok(items)
    }

    /// Achievements of the given metric whose requirement the value now
    /// meets, excluding ones the user already unlocked.
    pub async fn unlockable(
        &self,
        user_id: i32,
        metric: MetricType,
        value: i32,
    ) -> Result<Vec<achievements::Model>> {
        let unlocked_ids: Vec<i32> = user_achievements::Entity::find()
            .filter(user_achievements::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await
            .context("Failed to query unlocked achievements")?
            .into_iter()
            .map(|ua| ua.achievement_id)
            .collect();

        let mut query = achievements::Entity::find()
            .filter(achievements::Column::RequirementType.eq(metric.as_str()))
            .filter(achievements::Column::RequirementValue.lte(value))
            .order_by_asc(achievements::Column::Id);

        if !unlocked_ids.is_empty() {
            query = query.filter(achievements::Column::Id.is_not_in(unlocked_ids));
        }

        let items = query
            .all(&self.conn)
            .await
            .context("Failed to query unlockable achievements")?;

        Ok(items)
    }

    /// Record an unlock; returns false when the row already existed, so a
    /// concurrent evaluation cannot double-award.
    pub async fn try_unlock(&self, user_id: i32, achievement_id: i32) -> Result<bool> {
        let active = user_achievements::ActiveModel {
            user_id: Set(user_id),
            achievement_id: Set(achievement_id),
            unlocked_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(e).context("Failed to insert achievement unlock"),
        }
    }

    /// Unlocks joined to their achievement rows, newest first.
    pub async fn unlocked_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_achievements::Model, Option<achievements::Model>)>> {
        let items = user_achievements::Entity::find()
            .filter(user_achievements::Column::UserId.eq(user_id))
            .order_by_desc(user_achievements::Column::UnlockedAt)
            .find_also_related(achievements::Entity)
            .all(&self.conn)
            .await
            .context("Failed to list unlocked achievements")?;

        Ok(items)
    }
}
