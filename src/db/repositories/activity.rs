use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::activity_log;
use crate::models::ActionType;

pub struct ActivityRepository {
    conn: DatabaseConnection,
}

impl ActivityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Append an entry. Rows are never updated or deleted.
    pub async fn add(
        &self,
        user_id: i32,
        action_type: ActionType,
        details: &serde_json::Value,
    ) -> Result<()> {
        let active = activity_log::ActiveModel {
            user_id: Set(user_id),
            action_type: Set(action_type.as_str().to_string()),
            details: Set(details.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        activity_log::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert activity log entry")?;

        Ok(())
    }

    pub async fn for_user(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<activity_log::Model>, u64)> {
        let paginator = activity_log::Entity::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_desc(activity_log::Column::CreatedAt)
            .paginate(&self.conn, page_size);

        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn recent(&self, page: u64, page_size: u64) -> Result<(Vec<activity_log::Model>, u64)> {
        let paginator = activity_log::Entity::find()
            .order_by_desc(activity_log::Column::CreatedAt)
            .paginate(&self.conn, page_size);

        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }
}
