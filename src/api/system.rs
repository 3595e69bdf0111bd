//! System API endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::validate_paging;
use super::{ActivityDto, ApiError, ApiResponse, AppState, PageQuery, Paginated, SystemStatus};
use crate::config::Config;

/// GET /system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let store = state.store();

    let users = store
        .count_users()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count users: {e}")))?;
    let vulnerabilities = store
        .count_vulnerabilities()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count vulnerabilities: {e}")))?;
    let open_vulnerabilities = store
        .count_open_vulnerabilities()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count open vulnerabilities: {e}")))?;
    let active_quests = store
        .count_active_quests()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count quests: {e}")))?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        users,
        vulnerabilities,
        open_vulnerabilities,
        active_quests,
    })))
}

/// GET /system/config
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    let config = state.config().read().await.clone();
    Ok(Json(ApiResponse::success(config)))
}

/// PUT /system/config
/// Validates, persists to disk, and swaps the running config
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(new_config): Json<Config>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    new_config
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if let Err(e) = new_config.save() {
        tracing::warn!("Failed to persist config to disk: {e}");
    }

    {
        let mut config = state.config().write().await;
        *config = new_config.clone();
    }

    tracing::info!("Configuration updated");

    Ok(Json(ApiResponse::success(new_config)))
}

/// GET /system/activity
/// Recent activity across all users
pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<ActivityDto>>>, ApiError> {
    let (page, page_size) = validate_paging(query.page, query.page_size)?;

    let (entries, total_pages) = state
        .store()
        .recent_activity(page, page_size)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load activity: {e}")))?;

    Ok(Json(ApiResponse::success(Paginated {
        items: entries.into_iter().map(ActivityDto::from).collect(),
        page,
        total_pages,
    })))
}
