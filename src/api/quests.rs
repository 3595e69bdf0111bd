use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_battle_action, validate_id};
use super::{ApiError, ApiResponse, AppState, QuestCompletionDto, QuestDto};
use crate::services::{QuestAttempt, UnlockedAchievement};

#[derive(Deserialize)]
pub struct AttemptRequest {
    pub action: String,
}

#[derive(Serialize)]
pub struct AttemptResponse {
    pub success: bool,
    pub message: String,
    pub damage_dealt: i32,
    pub turns: u32,
    pub log: Vec<String>,
    pub exp_gained: i32,
    pub level: i32,
    pub leveled_up: bool,
    pub unlocked: Vec<UnlockedAchievement>,
}

impl From<QuestAttempt> for AttemptResponse {
    fn from(attempt: QuestAttempt) -> Self {
        Self {
            success: attempt.battle.success,
            message: attempt.battle.message,
            damage_dealt: attempt.battle.damage_dealt,
            turns: attempt.battle.turns,
            log: attempt.battle.log,
            exp_gained: attempt.exp_gained,
            level: attempt.level,
            leveled_up: attempt.leveled_up,
            unlocked: attempt.unlocked,
        }
    }
}

/// GET /quests
/// Active quests, flagged with the caller's completion state
pub async fn list_quests(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<QuestDto>>>, ApiError> {
    let quests = state.quest_service().list().await?;

    let completed: HashSet<i32> = state
        .quest_service()
        .completions(current.id)
        .await?
        .into_iter()
        .map(|(completion, _)| completion.quest_id)
        .collect();

    let items = quests
        .into_iter()
        .map(|quest| {
            let id = quest.id;
            let mut dto = QuestDto::from(quest);
            dto.completed = Some(completed.contains(&id));
            dto
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// GET /quests/completed
/// The caller's cleared quests, newest first
pub async fn completed_quests(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<QuestCompletionDto>>>, ApiError> {
    let completions = state.quest_service().completions(current.id).await?;

    let items = completions
        .into_iter()
        .map(|(completion, quest)| QuestCompletionDto {
            quest_id: completion.quest_id,
            boss_name: quest.as_ref().map(|q| q.boss_name.clone()),
            floor_number: quest.as_ref().map(|q| q.floor_number),
            completed_at: completion.completed_at,
            damage_dealt: completion.damage_dealt,
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// POST /quests/{id}/attempt
/// Fight the boss; a cleared quest cannot be attempted again
pub async fn attempt_quest(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<AttemptRequest>,
) -> Result<Json<ApiResponse<AttemptResponse>>, ApiError> {
    let id = validate_id(id, "quest")?;
    let action = parse_battle_action(&payload.action)?;

    let attempt = state.quest_service().attempt(current.id, id, action).await?;

    tracing::info!(
        "Quest {} attempt by {}: {}",
        id,
        current.username,
        if attempt.battle.success { "won" } else { "lost" }
    );

    Ok(Json(ApiResponse::success(AttemptResponse::from(attempt))))
}
