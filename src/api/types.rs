use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::entities::{activity_log, quests, reports, reviews, vulnerabilities};
use crate::game::level_threshold;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub level: i32,
    pub exp: i32,
    /// Exp needed to reach the next level from the current one.
    pub next_level_exp: i32,
    pub title: String,
    pub avatar_url: Option<String>,
    pub reputation: i32,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            level: user.level,
            exp: user.exp,
            next_level_exp: level_threshold(user.level),
            title: user.title,
            avatar_url: user.avatar_url,
            reputation: user.reputation,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntryDto {
    pub rank: u64,
    pub username: String,
    pub level: i32,
    pub exp: i32,
    pub title: String,
    pub reputation: i32,
}

#[derive(Debug, Serialize)]
pub struct VulnerabilityDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub exp_reward: i32,
    pub reporter_id: Option<i32>,
    pub resolver_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<vulnerabilities::Model> for VulnerabilityDto {
    fn from(model: vulnerabilities::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            severity: model.severity,
            status: model.status,
            exp_reward: model.exp_reward,
            reporter_id: model.reporter_id,
            resolver_id: model.resolver_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportDto {
    pub id: i32,
    pub vulnerability_id: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<reports::Model> for ReportDto {
    fn from(model: reports::Model) -> Self {
        Self {
            id: model.id,
            vulnerability_id: model.vulnerability_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub user_id: i32,
    pub vulnerability_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<reviews::Model> for ReviewDto {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            vulnerability_id: model.vulnerability_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestDto {
    pub id: i32,
    pub boss_name: String,
    pub floor_number: i32,
    pub difficulty: String,
    pub exp_reward: i32,
    pub health_points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl From<quests::Model> for QuestDto {
    fn from(model: quests::Model) -> Self {
        Self {
            id: model.id,
            boss_name: model.boss_name,
            floor_number: model.floor_number,
            difficulty: model.difficulty,
            exp_reward: model.exp_reward,
            health_points: model.health_points,
            completed: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestCompletionDto {
    pub quest_id: i32,
    pub boss_name: Option<String>,
    pub floor_number: Option<i32>,
    pub completed_at: String,
    pub damage_dealt: i32,
}

#[derive(Debug, Serialize)]
pub struct ActivityDto {
    pub id: i32,
    pub action_type: String,
    pub details: serde_json::Value,
    pub created_at: String,
}

impl From<activity_log::Model> for ActivityDto {
    fn from(model: activity_log::Model) -> Self {
        let details = serde_json::from_str(&model.details)
            .unwrap_or(serde_json::Value::String(model.details));

        Self {
            id: model.id,
            action_type: model.action_type,
            details,
            created_at: model.created_at,
        }
    }
}

/// Wrapper for paginated list responses.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub users: u64,
    pub vulnerabilities: u64,
    pub open_vulnerabilities: u64,
    pub active_quests: u64,
}
