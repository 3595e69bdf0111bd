use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::state::SharedState;

mod achievements;
pub mod auth;
mod error;
pub mod events;
mod quests;
mod reports;
mod reviews;
mod system;
mod types;
mod users;
mod validation;
mod vulnerabilities;
pub mod observability;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::domain::NotificationEvent;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn event_bus(&self) -> &tokio::sync::broadcast::Sender<NotificationEvent> {
        &self.shared.event_bus
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn reward_service(&self) -> &Arc<dyn crate::services::RewardService> {
        &self.shared.reward_service
    }

    #[must_use]
    pub fn vulnerability_service(&self) -> &Arc<dyn crate::services::VulnerabilityService> {
        &self.shared.vulnerability_service
    }

    #[must_use]
    pub fn quest_service(&self) -> &Arc<dyn crate::services::QuestService> {
        &self.shared.quest_service
    }

    #[must_use]
    pub fn review_service(&self) -> &Arc<dyn crate::services::ReviewService> {
        &self.shared.review_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, session_expiry_minutes, secure_cookies) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.session_expiry_minutes,
            config.server.secure_cookies,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_expiry_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(events::router())
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/users/leaderboard", get(users::leaderboard))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/activity", get(users::get_user_activity))
        .route(
            "/vulnerabilities",
            get(vulnerabilities::list_vulnerabilities),
        )
        .route(
            "/vulnerabilities",
            post(vulnerabilities::report_vulnerability),
        )
        .route(
            "/vulnerabilities/{id}",
            get(vulnerabilities::get_vulnerability),
        )
        .route(
            "/vulnerabilities/{id}",
            delete(vulnerabilities::delete_vulnerability),
        )
        .route(
            "/vulnerabilities/{id}/status",
            put(vulnerabilities::update_status),
        )
        .route(
            "/vulnerabilities/{id}/resolve",
            post(vulnerabilities::resolve_vulnerability),
        )
        .route("/reports", get(reports::list_reports))
        .route("/reports", post(reports::create_report))
        .route("/reports/{id}", put(reports::update_report))
        .route("/reports/{id}", delete(reports::delete_report))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/{id}", put(reviews::update_review))
        .route("/reviews/{id}", delete(reviews::delete_review))
        .route("/quests", get(quests::list_quests))
        .route("/quests/completed", get(quests::completed_quests))
        .route("/quests/{id}/attempt", post(quests::attempt_quest))
        .route("/achievements", get(achievements::list_achievements))
        .route(
            "/achievements/unlocked",
            get(achievements::unlocked_achievements),
        )
        .route(
            "/achievements/progress",
            get(achievements::achievement_progress),
        )
        .route("/system/status", get(system::get_status))
        .route("/system/config", get(system::get_config))
        .route("/system/config", put(system::update_config))
        .route("/system/activity", get(system::get_activity))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
