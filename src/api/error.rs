use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),

    Forbidden(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<crate::services::AuthError> for ApiError {
    fn from(err: crate::services::AuthError) -> Self {
        use crate::services::AuthError;
        match err {
            AuthError::InvalidCredentials | AuthError::Unauthorized => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::AlreadyRegistered => ApiError::Conflict(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::SessionError(msg) | AuthError::Internal(msg) => {
                ApiError::InternalError(msg)
            }
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<crate::services::RewardError> for ApiError {
    fn from(err: crate::services::RewardError) -> Self {
        use crate::services::RewardError;
        match err {
            RewardError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            RewardError::InvalidDelta(_) => ApiError::ValidationError(err.to_string()),
            RewardError::Database(msg) => ApiError::DatabaseError(msg),
            RewardError::UpdateContention(_) | RewardError::Internal(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<crate::services::VulnerabilityError> for ApiError {
    fn from(err: crate::services::VulnerabilityError) -> Self {
        use crate::services::VulnerabilityError;
        match err {
            VulnerabilityError::NotFound => {
                ApiError::NotFound("Vulnerability not found".to_string())
            }
            VulnerabilityError::Conflict(msg) => ApiError::Conflict(msg),
            VulnerabilityError::Validation(msg) => ApiError::ValidationError(msg),
            VulnerabilityError::Database(msg) => ApiError::DatabaseError(msg),
            VulnerabilityError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<crate::services::QuestError> for ApiError {
    fn from(err: crate::services::QuestError) -> Self {
        use crate::services::QuestError;
        match err {
            QuestError::NotFound => ApiError::NotFound("Quest not found".to_string()),
            QuestError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            QuestError::AlreadyCompleted => ApiError::Conflict(err.to_string()),
            QuestError::Inactive => ApiError::ValidationError(err.to_string()),
            QuestError::Database(msg) => ApiError::DatabaseError(msg),
            QuestError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<crate::services::ReviewError> for ApiError {
    fn from(err: crate::services::ReviewError) -> Self {
        use crate::services::ReviewError;
        match err {
            ReviewError::NotFound => ApiError::NotFound("Review not found".to_string()),
            ReviewError::VulnerabilityNotFound => {
                ApiError::NotFound("Vulnerability not found".to_string())
            }
            ReviewError::AlreadyReviewed => ApiError::Conflict(err.to_string()),
            ReviewError::Validation(msg) => ApiError::ValidationError(msg),
            ReviewError::NotOwner => ApiError::Forbidden(err.to_string()),
            ReviewError::Database(msg) => ApiError::DatabaseError(msg),
            ReviewError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
