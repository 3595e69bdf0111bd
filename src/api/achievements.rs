use axum::{
    Json,
    extract::{Extension, State},
};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::services::AchievementProgress;

#[derive(Serialize)]
pub struct AchievementDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub exp_reward: i32,
    pub requirement_type: String,
    pub requirement_value: i32,
}

#[derive(Serialize)]
pub struct UnlockedDto {
    pub id: i32,
    pub name: Option<String>,
    pub unlocked_at: String,
}

/// GET /achievements
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AchievementDto>>>, ApiError> {
    let achievements = state
        .store()
        .list_achievements()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list achievements: {e}")))?;

    let items = achievements
        .into_iter()
        .map(|a| AchievementDto {
            id: a.id,
            name: a.name,
            description: a.description,
            exp_reward: a.exp_reward,
            requirement_type: a.requirement_type,
            requirement_value: a.requirement_value,
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// GET /achievements/unlocked
/// The caller's unlocks, newest first
pub async fn unlocked_achievements(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<UnlockedDto>>>, ApiError> {
    let unlocked = state
        .store()
        .achievements_by_user(current.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list unlocks: {e}")))?;

    let items = unlocked
        .into_iter()
        .map(|(ua, achievement)| UnlockedDto {
            id: ua.achievement_id,
            name: achievement.map(|a| a.name),
            unlocked_at: ua.unlocked_at,
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// GET /achievements/progress
/// Progress toward every achievement for the caller
pub async fn achievement_progress(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<AchievementProgress>>>, ApiError> {
    let progress = state
        .reward_service()
        .achievement_progress(current.id)
        .await?;

    Ok(Json(ApiResponse::success(progress)))
}
