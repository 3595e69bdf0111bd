use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::{validate_id, validate_paging};
use super::{
    ActivityDto, ApiError, ApiResponse, AppState, LeaderboardEntryDto, PageQuery, Paginated,
    UserDto,
};
use crate::constants::limits::MAX_ACTIVITY_PAGE_SIZE;

/// GET /users/leaderboard
/// Users ranked by level, exp, then reputation
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<LeaderboardEntryDto>>>, ApiError> {
    let (page, page_size) = validate_paging(query.page, query.page_size)?;

    let (users, total_pages) = state
        .store()
        .leaderboard(page, page_size)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load leaderboard: {e}")))?;

    let offset = (page - 1) * page_size;
    let items = users
        .into_iter()
        .enumerate()
        .map(|(i, user)| LeaderboardEntryDto {
            rank: offset + i as u64 + 1,
            username: user.username,
            level: user.level,
            exp: user.exp,
            title: user.title,
            reputation: user.reputation,
        })
        .collect();

    Ok(Json(ApiResponse::success(Paginated {
        items,
        page,
        total_pages,
    })))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_id(id, "user")?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// GET /users/{id}/activity
/// The user's activity trail, newest first
pub async fn get_user_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<ActivityDto>>>, ApiError> {
    let id = validate_id(id, "user")?;
    let (page, page_size) = validate_paging(query.page, query.page_size)?;
    let page_size = page_size.min(MAX_ACTIVITY_PAGE_SIZE);

    state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    let (entries, total_pages) = state
        .store()
        .activity_for_user(id, page, page_size)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load activity: {e}")))?;

    Ok(Json(ApiResponse::success(Paginated {
        items: entries.into_iter().map(ActivityDto::from).collect(),
        page,
        total_pages,
    })))
}
