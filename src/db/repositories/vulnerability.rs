use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::vulnerabilities;
use crate::models::{Severity, VulnStatus};

pub struct VulnerabilityRepository {
    conn: DatabaseConnection,
}

impl VulnerabilityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        title: &str,
        description: &str,
        severity: Severity,
        exp_reward: i32,
        reporter_id: i32,
    ) -> Result<vulnerabilities::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = vulnerabilities::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            severity: Set(severity.as_str().to_string()),
            status: Set(VulnStatus::Open.as_str().to_string()),
            exp_reward: Set(exp_reward),
            reporter_id: Set(Some(reporter_id)),
            resolver_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert vulnerability")?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<vulnerabilities::Model>> {
        let model = vulnerabilities::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query vulnerability")?;

        Ok(model)
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        status: Option<VulnStatus>,
        severity: Option<Severity>,
    ) -> Result<(Vec<vulnerabilities::Model>, u64)> {
        let mut query =
            vulnerabilities::Entity::find().order_by_desc(vulnerabilities::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(vulnerabilities::Column::Status.eq(status.as_str()));
        }

        if let Some(severity) = severity {
            query = query.filter(vulnerabilities::Column::Severity.eq(severity.as_str()));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn update_status(&self, id: i32, status: VulnStatus) -> Result<()> {
        let model = vulnerabilities::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query vulnerability for status update")?
            .ok_or_else(|| anyhow::anyhow!("Vulnerability not found: {id}"))?;

        let mut active: vulnerabilities::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Mark resolved and record the resolver.
    pub async fn resolve(&self, id: i32, resolver_id: i32) -> Result<vulnerabilities::Model> {
        let model = vulnerabilities::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query vulnerability for resolution")?
            .ok_or_else(|| anyhow::anyhow!("Vulnerability not found: {id}"))?;

        let mut active: vulnerabilities::ActiveModel = model.into();
        active.status = Set(VulnStatus::Resolved.as_str().to_string());
        active.resolver_id = Set(Some(resolver_id));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = vulnerabilities::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete vulnerability")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_reported_by(&self, user_id: i32) -> Result<u64> {
        let count = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::ReporterId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn count_resolved_by(&self, user_id: i32) -> Result<u64> {
        let count = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::ResolverId.eq(user_id))
            .filter(vulnerabilities::Column::Status.eq(VulnStatus::Resolved.as_str()))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = vulnerabilities::Entity::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn count_open(&self) -> Result<u64> {
        let count = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::Status.eq(VulnStatus::Open.as_str()))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
