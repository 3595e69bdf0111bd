//! Domain service for vulnerability reporting and resolution.

use thiserror::Error;

use crate::entities::vulnerabilities;
use crate::models::{Severity, VulnStatus};
use crate::services::reward_service::RewardOutcome;

/// Errors specific to vulnerability operations.
#[derive(Debug, Error)]
pub enum VulnerabilityError {
    #[error("Vulnerability not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for VulnerabilityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for VulnerabilityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<crate::services::reward_service::RewardError> for VulnerabilityError {
    fn from(err: crate::services::reward_service::RewardError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for a new vulnerability report.
#[derive(Debug, Clone)]
pub struct NewVulnerability {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Defaults per severity when not given.
    pub exp_reward: Option<i32>,
}

/// A freshly reported vulnerability plus the reporter's reward.
#[derive(Debug, Clone)]
pub struct ReportedVulnerability {
    pub vulnerability: vulnerabilities::Model,
    pub report_id: i32,
    pub reward: RewardOutcome,
}

/// A resolved vulnerability plus the resolver's reward.
#[derive(Debug, Clone)]
pub struct ResolvedVulnerability {
    pub vulnerability: vulnerabilities::Model,
    pub reputation_gained: i32,
    pub reward: RewardOutcome,
}

/// Domain service trait for vulnerabilities.
#[async_trait::async_trait]
pub trait VulnerabilityService: Send + Sync {
    async fn list(
        &self,
        page: u64,
        page_size: u64,
        status: Option<VulnStatus>,
        severity: Option<Severity>,
    ) -> Result<(Vec<vulnerabilities::Model>, u64), VulnerabilityError>;

    async fn get(&self, id: i32) -> Result<vulnerabilities::Model, VulnerabilityError>;

    /// Creates the vulnerability and the reporter's report row, then runs
    /// the reward cascade for `vulnerabilities_reported`.
    async fn report(
        &self,
        reporter_id: i32,
        input: NewVulnerability,
    ) -> Result<ReportedVulnerability, VulnerabilityError>;

    async fn update_status(
        &self,
        id: i32,
        status: VulnStatus,
    ) -> Result<vulnerabilities::Model, VulnerabilityError>;

    /// Marks resolved, credits the resolver with the vulnerability's
    /// `exp_reward` and reputation, and runs the cascade for
    /// `vulnerabilities_resolved`.
    ///
    /// # Errors
    ///
    /// Returns [`VulnerabilityError::Conflict`] if already resolved or
    /// closed.
    async fn resolve(
        &self,
        id: i32,
        resolver_id: i32,
    ) -> Result<ResolvedVulnerability, VulnerabilityError>;

    async fn delete(&self, id: i32) -> Result<(), VulnerabilityError>;
}
