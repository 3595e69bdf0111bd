use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_status, validate_id, validate_paging};
use super::{ApiError, ApiResponse, AppState, PageQuery, Paginated, ReportDto};

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub vulnerability_id: i32,
}

#[derive(Deserialize)]
pub struct UpdateReportRequest {
    pub status: String,
}

/// GET /reports
/// The caller's own reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<ReportDto>>>, ApiError> {
    let (page, page_size) = validate_paging(query.page, query.page_size)?;

    let (items, total_pages) = state
        .store()
        .list_reports_by_user(current.id, page, page_size)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list reports: {e}")))?;

    Ok(Json(ApiResponse::success(Paginated {
        items: items.into_iter().map(ReportDto::from).collect(),
        page,
        total_pages,
    })))
}

/// POST /reports
/// Track an existing vulnerability (one report per user per vulnerability)
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<ApiResponse<ReportDto>>, ApiError> {
    let vulnerability_id = validate_id(payload.vulnerability_id, "vulnerability")?;

    state
        .store()
        .get_vulnerability(vulnerability_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get vulnerability: {e}")))?
        .ok_or_else(|| ApiError::not_found("Vulnerability", vulnerability_id))?;

    let report = state
        .store()
        .insert_report(current.id, vulnerability_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create report: {e}")))?
        .ok_or_else(|| {
            ApiError::Conflict("You already have a report for this vulnerability".to_string())
        })?;

    Ok(Json(ApiResponse::success(ReportDto::from(report))))
}

/// PUT /reports/{id}
/// Owner-only status update
pub async fn update_report(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReportRequest>,
) -> Result<Json<ApiResponse<ReportDto>>, ApiError> {
    let id = validate_id(id, "report")?;
    let status = parse_status(&payload.status)?;

    let report = state
        .store()
        .get_report(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get report: {e}")))?
        .ok_or_else(|| ApiError::not_found("Report", id))?;

    if report.user_id != current.id {
        return Err(ApiError::Forbidden(
            "Only the owner can modify a report".to_string(),
        ));
    }

    let updated = state
        .store()
        .update_report_status(id, status)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update report: {e}")))?;

    Ok(Json(ApiResponse::success(ReportDto::from(updated))))
}

/// DELETE /reports/{id}
/// Owner-only delete
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id, "report")?;

    let report = state
        .store()
        .get_report(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get report: {e}")))?
        .ok_or_else(|| ApiError::not_found("Report", id))?;

    if report.user_id != current.id {
        return Err(ApiError::Forbidden(
            "Only the owner can delete a report".to_string(),
        ));
    }

    state
        .store()
        .delete_report(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete report: {e}")))?;

    Ok(Json(ApiResponse {
        success: true,
        data: None,
        error: None,
    }))
}
