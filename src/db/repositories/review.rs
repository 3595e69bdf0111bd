use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entities::reviews;

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a review; returns `None` when the user already reviewed the
    /// given vulnerability.
    pub async fn try_insert(
        &self,
        user_id: i32,
        vulnerability_id: Option<i32>,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Option<reviews::Model>> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = reviews::ActiveModel {
            user_id: Set(user_id),
            vulnerability_id: Set(vulnerability_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert review"),
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<reviews::Model>> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query review")?;

        Ok(model)
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        vulnerability_id: Option<i32>,
    ) -> Result<(Vec<reviews::Model>, u64)> {
        let mut query = reviews::Entity::find().order_by_desc(reviews::Column::CreatedAt);

        if let Some(vulnerability_id) = vulnerability_id {
            query = query.filter(reviews::Column::VulnerabilityId.eq(vulnerability_id));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    /// In-place edit of rating/comment; everything else is immutable.
    pub async fn update(
        &self,
        id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<reviews::Model> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query review for update")?
            .ok_or_else(|| anyhow::anyhow!("Review not found: {id}"))?;

        let mut active: reviews::ActiveModel = model.into();
        active.rating = Set(rating);
        active.comment = Set(comment);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete review")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_by_user(&self, user_id: i32) -> Result<u64> {
        let count = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
