use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entities::reports;
use crate::models::VulnStatus;

pub struct ReportRepository {
    conn: DatabaseConnection,
}

impl ReportRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a report; returns `None` when the (user, vulnerability) pair
    /// already has one.
    pub async fn try_insert(
        &self,
        user_id: i32,
        vulnerability_id: i32,
    ) -> Result<Option<reports::Model>> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = reports::ActiveModel {
            user_id: Set(user_id),
            vulnerability_id: Set(vulnerability_id),
            status: Set(VulnStatus::Open.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert report"),
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<reports::Model>> {
        let model = reports::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query report")?;

        Ok(model)
    }

    pub async fn find_for(
        &self,
        user_id: i32,
        vulnerability_id: i32,
    ) -> Result<Option<reports::Model>> {
        let model = reports::Entity::find()
            .filter(reports::Column::UserId.eq(user_id))
            .filter(reports::Column::VulnerabilityId.eq(vulnerability_id))
            .one(&self.conn)
            .await
            .context("Failed to query report by pair")?;

        Ok(model)
    }

    pub async fn list_by_user(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<reports::Model>, u64)> {
        let paginator = reports::Entity::find()
            .filter(reports::Column::UserId.eq(user_id))
            .order_by_desc(reports::Column::CreatedAt)
            .paginate(&self.conn, page_size);

        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn update_status(&self, id: i32, status: VulnStatus) -> Result<reports::Model> {
        let model = reports::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query report for status update")?
            .ok_or_else(|| anyhow::anyhow!("Report not found: {id}"))?;

        let mut active: reports::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = reports::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete report")?;

        Ok(result.rows_affected > 0)
    }
}
