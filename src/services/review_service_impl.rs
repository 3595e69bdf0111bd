//! `SeaORM` implementation of the `ReviewService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::config::GameConfig;
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::entities::reviews;
use crate::models::{ActionType, MetricType};
use crate::services::review_service::{NewReview, ReviewError, ReviewService};
use crate::services::reward_service::RewardService;

pub struct SeaOrmReviewService {
    store: Store,
    rewards: Arc<dyn RewardService>,
    game: GameConfig,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmReviewService {
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
}

fn validate_rating(rating: i32) -> Result<(), ReviewError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::Validation(format!(
            "Rating must be between 1 and 5, got {rating}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn list(
        &self,
        page: u64,
        page_size: u64,
        vulnerability_id: Option<i32>,
    ) -> Result<(Vec<reviews::Model>, u64), ReviewError> {
        let result = self
            .store
            .list_reviews(page, page_size, vulnerability_id)
            .await?;

        Ok(result)
    }

    async fn create(&self, user_id: i32, input: NewReview) -> Result<reviews::Model, ReviewError> {
        validate_rating(input.rating)?;

        if let Some(vulnerability_id) = input.vulnerability_id {
            self.store
                .get_vulnerability(vulnerability_id)
                .await?
                .ok_or(ReviewError::VulnerabilityNotFound)?;
        }

        let review = self
            .store
            .insert_review(user_id, input.vulnerability_id, input.rating, input.comment)
            .await?
            .ok_or(ReviewError::AlreadyReviewed)?;

        self.rewards
            .record_activity(
                user_id,
                ActionType::ReviewPosted,
                serde_json::json!({
                    "review_id": review.id,
                    "vulnerability_id": review.vulnerability_id,
                    "rating": review.rating,
                }),
            )
            .await;

        self.rewards
            .grant_experience(user_id, self.game.review_exp_reward, "review posted")
            .await?;

        let given = self.store.count_reviews_by_user(user_id).await?;
        self.rewards
            .evaluate_achievements(
                user_id,
                MetricType::ReviewsGiven,
                i32::try_from(given).unwrap_or(i32::MAX),
            )
            .await?;

        let _ = self.event_bus.send(NotificationEvent::ReviewPosted {
            review_id: review.id,
            rating: review.rating,
        });

        Ok(review)
    }

    async fn update(
        &self,
        user_id: i32,
        review_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<reviews::Model, ReviewError> {
        validate_rating(rating)?;

        let review = self
            .store
            .get_review(review_id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        if review.user_id != user_id {
            return Err(ReviewError::NotOwner);
        }

        let updated = self.store.update_review(review_id, rating, comment).await?;

        Ok(updated)
    }

    async fn delete(&self, user_id: i32, review_id: i32) -> Result<(), ReviewError> {
        let review = self
            .store
            .get_review(review_id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        if review.user_id != user_id {
            return Err(ReviewError::NotOwner);
        }

        self.store.delete_review(review_id).await?;

        Ok(())
    }
}
