//! Domain service for reviews.

use thiserror::Error;

use crate::entities::reviews;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found")]
    NotFound,

    #[error("Vulnerability not found")]
    VulnerabilityNotFound,

    #[error("You have already reviewed this vulnerability")]
    AlreadyReviewed,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Only the author can modify a review")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<crate::services::reward_service::RewardError> for ReviewError {
    fn from(err: crate::services::reward_service::RewardError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub vulnerability_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Domain service trait for reviews.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    async fn list(
        &self,
        page: u64,
        page_size: u64,
        vulnerability_id: Option<i32>,
    ) -> Result<(Vec<reviews::Model>, u64), ReviewError>;

    /// Creates a review and runs the reward cascade for `reviews_given`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::AlreadyReviewed`] when the author already
    /// reviewed the target vulnerability.
    async fn create(&self, user_id: i32, input: NewReview) -> Result<reviews::Model, ReviewError>;

    /// In-place edit of rating/comment by the author.
    async fn update(
        &self,
        user_id: i32,
        review_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<reviews::Model, ReviewError>;

    async fn delete(&self, user_id: i32, review_id: i32) -> Result<(), ReviewError>;
}
