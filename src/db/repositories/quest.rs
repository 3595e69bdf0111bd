use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entities::{quests, user_quests};

pub struct QuestRepository {
    conn: DatabaseConnection,
}

impl QuestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_active(&self) -> Result<Vec<quests::Model>> {
        let items = quests::Entity::find()
            .filter(quests::Column::Active.eq(true))
            .order_by_asc(quests::Column::FloorNumber)
            .all(&self.conn)
            .await
            .context("Failed to list quests")?;

        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Option<quests::Model>> {
        let model = quests::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query quest")?;

        Ok(model)
    }

    pub async fn is_completed(&self, user_id: i32, quest_id: i32) -> Result<bool> {
        let count = user_quests::Entity::find()
            .filter(user_quests::Column::UserId.eq(user_id))
            .filter(user_quests::Column::QuestId.eq(quest_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Record a completion; returns `None` when the quest was already
    /// cleared by this user (unique pair constraint).
    pub async fn try_insert_completion(
        &self,
        user_id: i32,
        quest_id: i32,
        damage_dealt: i32,
    ) -> Result<Option<user_quests::Model>> {
        let active = user_quests::ActiveModel {
            user_id: Set(user_id),
            quest_id: Set(quest_id),
            completed_at: Set(chrono::Utc::now().to_rfc3339()),
            damage_dealt: Set(damage_dealt),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert quest completion"),
        }
    }

    /// Completions joined to their quest rows, newest first.
    pub async fn completions_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_quests::Model, Option<quests::Model>)>> {
        let items = user_quests::Entity::find()
            .filter(user_quests::Column::UserId.eq(user_id))
            .order_by_desc(user_quests::Column::CompletedAt)
            .find_also_related(quests::Entity)
            .all(&self.conn)
            .await
            .context("Failed to list quest completions")?;

        Ok(items)
    }

    pub async fn count_completed_by(&self, user_id: i32) -> Result<u64> {
        let count = user_quests::Entity::find()
            .filter(user_quests::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn count_active(&self) -> Result<u64> {
        let count = quests::Entity::find()
            .filter(quests::Column::Active.eq(true))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
