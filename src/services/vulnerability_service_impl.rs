//! `SeaORM` implementation of the `VulnerabilityService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::config::GameConfig;
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::entities::vulnerabilities;
use crate::models::{ActionType, MetricType, Severity, VulnStatus};
use crate::services::reward_service::RewardService;
use crate::services::vulnerability_service::{
    NewVulnerability, ReportedVulnerability, ResolvedVulnerability, VulnerabilityError,
    VulnerabilityService,
};

pub struct SeaOrmVulnerabilityService {
    store: Store,
    rewards: Arc<dyn RewardService>,
    game: GameConfig,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmVulnerabilityService {
    #[must_use]
    pub fn new(
        store: Store,
        rewards: Arc<dyn RewardService>,
        game: GameConfig,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            rewards,
            game,
            event_bus,
        }
    }

    async fn reported_count(&self, user_id: i32) -> Result<i32, VulnerabilityError> {
        let count = self
            .store
            .count_vulnerabilities_reported_by(user_id)
            .await?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    async fn resolved_count(&self, user_id: i32) -> Result<i32, VulnerabilityError> {
        let count = self
            .store
            .count_vulnerabilities_resolved_by(user_id)
            .await?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }
}

#[async_trait]
impl VulnerabilityService for SeaOrmVulnerabilityService {
    async fn list(
        &self,
        page: u64,
        page_size: u64,
        status: Option<VulnStatus>,
        severity: Option<Severity>,
    ) -> Result<(Vec<vulnerabilities::Model>, u64), VulnerabilityError> {
        let result = self
            .store
            .list_vulnerabilities(page, page_size, status, severity)
            .await?;

        Ok(result)
    }

    async fn get(&self, id: i32) -> Result<vulnerabilities::Model, VulnerabilityError> {
        self.store
            .get_vulnerability(id)
            .await?
            .ok_or(VulnerabilityError::NotFound)
    }

    async fn report(
        &self,
        reporter_id: i32,
        input: NewVulnerability,
    ) -> Result<ReportedVulnerability, VulnerabilityError> {
        if input.title.trim().is_empty() {
            return Err(VulnerabilityError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        let exp_reward = match input.exp_reward {
            Some(reward) if reward < 0 => {
                return Err(VulnerabilityError::Validation(
                    "Experience reward cannot be negative".to_string(),
                ));
            }
            Some(reward) => reward,
            None => input.severity.default_exp_reward(),
        };

        let vulnerability = self
            .store
            .create_vulnerability(
                input.title.trim(),
                &input.description,
                input.severity,
                exp_reward,
                reporter_id,
            )
            .await?;

        // The reporter's own tracking row. The pair is fresh, so a conflict
        // here means a concurrent duplicate create, which we surface.
        let report = self
            .store
            .insert_report(reporter_id, vulnerability.id)
            .await?
            .ok_or_else(|| {
                VulnerabilityError::Conflict("Report already exists for this pair".to_string())
            })?;

        self.rewards
            .record_activity(
                reporter_id,
                ActionType::VulnerabilityReported,
                serde_json::json!({
                    "vulnerability_id": vulnerability.id,
                    "title": vulnerability.title,
                    "severity": vulnerability.severity,
                }),
            )
            .await;

        let reward = self
            .rewards
            .grant_experience(reporter_id, self.game.report_exp_reward, "vulnerability report")
            .await?;

        let reported = self.reported_count(reporter_id).await?;
        self.rewards
            .evaluate_achievements(reporter_id, MetricType::VulnerabilitiesReported, reported)
            .await?;

        let _ = self.event_bus.send(NotificationEvent::VulnerabilityReported {
            vulnerability_id: vulnerability.id,
            title: vulnerability.title.clone(),
            severity: vulnerability.severity.clone(),
        });

        Ok(ReportedVulnerability {
            vulnerability,
            report_id: report.id,
            reward,
        })
    }

    async fn update_status(
        &self,
        id: i32,
        status: VulnStatus,
    ) -> Result<vulnerabilities::Model, VulnerabilityError> {
        let existing = self
            .store
            .get_vulnerability(id)
            .await?
            .ok_or(VulnerabilityError::NotFound)?;

        if existing.status == VulnStatus::Resolved.as_str()
            && status != VulnStatus::Closed
        {
            return Err(VulnerabilityError::Conflict(
                "Resolved vulnerabilities can only be closed".to_string(),
            ));
        }

        self.store.update_vulnerability_status(id, status).await?;

        self.store
            .get_vulnerability(id)
            .await?
            .ok_or(VulnerabilityError::NotFound)
    }

    async fn resolve(
        &self,
        id: i32,
        resolver_id: i32,
    ) -> Result<ResolvedVulnerability, VulnerabilityError> {
        let existing = self
            .store
            .get_vulnerability(id)
            .await?
            .ok_or(VulnerabilityError::NotFound)?;

        if existing.status == VulnStatus::Resolved.as_str()
            || existing.status == VulnStatus::Closed.as_str()
        {
            return Err(VulnerabilityError::Conflict(format!(
                "Vulnerability is already {}",
                existing.status
            )));
        }

        let resolver = self
            .store
            .get_user_by_id(resolver_id)
            .await?
            .ok_or_else(|| VulnerabilityError::Internal("Resolver not found".to_string()))?;

        let vulnerability = self.store.resolve_vulnerability(id, resolver_id).await?;

        // Close out the resolver's tracking report if one exists.
        if let Some(report) = self.store.find_report_for(resolver_id, id).await? {
            self.store
                .update_report_status(report.id, VulnStatus::Resolved)
                .await?;
        }

        self.store
            .add_reputation(resolver_id, self.game.reputation_per_resolve)
            .await?;

        self.rewards
            .record_activity(
                resolver_id,
                ActionType::VulnerabilityResolved,
                serde_json::json!({
                    "vulnerability_id": vulnerability.id,
                    "title": vulnerability.title,
                    "exp_reward": vulnerability.exp_reward,
                    "reputation": self.game.reputation_per_resolve,
                }),
            )
            .await;

        let reward = self
            .rewards
            .grant_experience(
                resolver_id,
                vulnerability.exp_reward,
                "vulnerability resolved",
            )
            .await?;

        let resolved = self.resolved_count(resolver_id).await?;
        self.rewards
            .evaluate_achievements(resolver_id, MetricType::VulnerabilitiesResolved, resolved)
            .await?;

        let _ = self.event_bus.send(NotificationEvent::VulnerabilityResolved {
            vulnerability_id: vulnerability.id,
            title: vulnerability.title.clone(),
            resolver: resolver.username,
        });

        Ok(ResolvedVulnerability {
            vulnerability,
            reputation_gained: self.game.reputation_per_resolve,
            reward,
        })
    }

    async fn delete(&self, id: i32) -> Result<(), VulnerabilityError> {
        let deleted = self.store.delete_vulnerability(id).await?;

        if deleted {
            Ok(())
        } else {
            Err(VulnerabilityError::NotFound)
        }
    }
}
