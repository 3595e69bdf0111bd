use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_id, validate_paging, validate_rating};
use super::{ApiError, ApiResponse, AppState, Paginated, ReviewDto};
use crate::services::NewReview;

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub vulnerability_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub vulnerability_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<ReviewDto>>>, ApiError> {
    let (page, page_size) = validate_paging(query.page, query.page_size)?;

    let vulnerability_id = query
        .vulnerability_id
        .map(|id| validate_id(id, "vulnerability"))
        .transpose()?;

    let (items, total_pages) = state
        .review_service()
        .list(page, page_size, vulnerability_id)
        .await?;

    Ok(Json(ApiResponse::success(Paginated {
        items: items.into_iter().map(ReviewDto::from).collect(),
        page,
        total_pages,
    })))
}

/// POST /reviews
/// Post a review; grants the author experience
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_rating(payload.rating)?;

    let vulnerability_id = payload
        .vulnerability_id
        .map(|id| validate_id(id, "vulnerability"))
        .transpose()?;

    let review = state
        .review_service()
        .create(
            current.id,
            NewReview {
                vulnerability_id,
                rating: payload.rating,
                comment: payload.comment,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

/// PUT /reviews/{id}
/// Author-only edit of rating/comment
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id(id, "review")?;
    validate_rating(payload.rating)?;

    let review = state
        .review_service()
        .update(current.id, id, payload.rating, payload.comment)
        .await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

/// DELETE /reviews/{id}
/// Author-only delete
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id, "review")?;

    state.review_service().delete(current.id, id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: None,
        error: None,
    }))
}
