use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_severity, parse_status, validate_id, validate_paging};
use super::{ApiError, ApiResponse, AppState, Paginated, VulnerabilityDto};
use crate::services::{NewVulnerability, RewardOutcome};

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<String>,
    pub severity: Option<String>,
}

#[derive(Deserialize)]
pub struct ReportRequest {
    pub title: String,
    pub description: String,
    pub severity: String,
    pub exp_reward: Option<i32>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub vulnerability: VulnerabilityDto,
    pub report_id: i32,
    pub reward: RewardOutcome,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub vulnerability: VulnerabilityDto,
    pub reputation_gained: i32,
    pub reward: RewardOutcome,
}

/// GET /vulnerabilities
pub async fn list_vulnerabilities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<VulnerabilityDto>>>, ApiError> {
    let (page, page_size) = validate_paging(query.page, query.page_size)?;

    let status = query.status.as_deref().map(parse_status).transpose()?;
    let severity = query.severity.as_deref().map(parse_severity).transpose()?;

    let (items, total_pages) = state
        .vulnerability_service()
        .list(page, page_size, status, severity)
        .await?;

    Ok(Json(ApiResponse::success(Paginated {
        items: items.into_iter().map(VulnerabilityDto::from).collect(),
        page,
        total_pages,
    })))
}

/// GET /vulnerabilities/{id}
pub async fn get_vulnerability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VulnerabilityDto>>, ApiError> {
    let id = validate_id(id, "vulnerability")?;

    let vulnerability = state.vulnerability_service().get(id).await?;

    Ok(Json(ApiResponse::success(VulnerabilityDto::from(
        vulnerability,
    ))))
}

/// POST /vulnerabilities
/// Report a new vulnerability; grants the reporter experience
pub async fn report_vulnerability(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let severity = parse_severity(&payload.severity)?;

    let reported = state
        .vulnerability_service()
        .report(
            current.id,
            NewVulnerability {
                title: payload.title,
                description: payload.description,
                severity,
                exp_reward: payload.exp_reward,
            },
        )
        .await?;

    tracing::info!(
        "Vulnerability {} reported by {}",
        reported.vulnerability.id,
        current.username
    );

    Ok(Json(ApiResponse::success(ReportResponse {
        vulnerability: VulnerabilityDto::from(reported.vulnerability),
        report_id: reported.report_id,
        reward: reported.reward,
    })))
}

/// PUT /vulnerabilities/{id}/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<ApiResponse<VulnerabilityDto>>, ApiError> {
    let id = validate_id(id, "vulnerability")?;
    let status = parse_status(&payload.status)?;

    let vulnerability = state
        .vulnerability_service()
        .update_status(id, status)
        .await?;

    Ok(Json(ApiResponse::success(VulnerabilityDto::from(
        vulnerability,
    ))))
}

/// POST /vulnerabilities/{id}/resolve
/// Resolve a vulnerability; grants the resolver its exp reward and reputation
pub async fn resolve_vulnerability(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ResolveResponse>>, ApiError> {
    let id = validate_id(id, "vulnerability")?;

    let resolved = state
        .vulnerability_service()
        .resolve(id, current.id)
        .await?;

    tracing::info!("Vulnerability {} resolved by {}", id, current.username);

    Ok(Json(ApiResponse::success(ResolveResponse {
        vulnerability: VulnerabilityDto::from(resolved.vulnerability),
        reputation_gained: resolved.reputation_gained,
        reward: resolved.reward,
    })))
}

/// DELETE /vulnerabilities/{id}
pub async fn delete_vulnerability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id, "vulnerability")?;

    state.vulnerability_service().delete(id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: None,
        error: None,
    }))
}
