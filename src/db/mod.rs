use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{
    achievements, activity_log, quests, reports, reviews, user_achievements, user_quests,
    vulnerabilities,
};
use crate::models::{ActionType, MetricType, Severity, VulnStatus};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn vulnerability_repo(&self) -> repositories::vulnerability::VulnerabilityRepository {
        repositories::vulnerability::VulnerabilityRepository::new(self.conn.clone())
    }

    fn report_repo(&self) -> repositories::report::ReportRepository {
        repositories::report::ReportRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn quest_repo(&self) -> repositories::quest::QuestRepository {
        repositories::quest::QuestRepository::new(self.conn.clone())
    }

    fn achievement_repo(&self) -> repositories::achievement::AchievementRepository {
        repositories::achievement::AchievementRepository::new(self.conn.clone())
    }

    fn activity_repo(&self) -> repositories::activity::ActivityRepository {
        repositories::activity::ActivityRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, security)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, username: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(username).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }

    pub async fn update_experience_guarded(
        &self,
        id: i32,
        expected_level: i32,
        expected_exp: i32,
        new_level: i32,
        new_exp: i32,
    ) -> Result<bool> {
        self.user_repo()
            .update_experience_guarded(id, expected_level, expected_exp, new_level, new_exp)
            .await
    }

    pub async fn add_reputation(&self, id: i32, delta: i32) -> Result<()> {
        self.user_repo().add_reputation(id, delta).await
    }

    pub async fn leaderboard(&self, page: u64, page_size: u64) -> Result<(Vec<User>, u64)> {
        self.user_repo().leaderboard(page, page_size).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ------------------------------------------------------------------
    // Vulnerabilities
    // ------------------------------------------------------------------

    pub async fn create_vulnerability(
        &self,
        title: &str,
        description: &str,
        severity: Severity,
        exp_reward: i32,
        reporter_id: i32,
    ) -> Result<vulnerabilities::Model> {
        self.vulnerability_repo()
            .create(title, description, severity, exp_reward, reporter_id)
            .await
    }

    pub async fn get_vulnerability(&self, id: i32) -> Result<Option<vulnerabilities::Model>> {
        self.vulnerability_repo().get(id).await
    }

    pub async fn list_vulnerabilities(
        &self,
        page: u64,
        page_size: u64,
        status: Option<VulnStatus>,
        severity: Option<Severity>,
    ) -> Result<(Vec<vulnerabilities::Model>, u64)> {
        self.vulnerability_repo()
            .list(page, page_size, status, severity)
            .await
    }

    pub async fn update_vulnerability_status(&self, id: i32, status: VulnStatus) -> Result<()> {
        self.vulnerability_repo().update_status(id, status).await
    }

    pub async fn resolve_vulnerability(
        &self,
        id: i32,
        resolver_id: i32,
    ) -> Result<vulnerabilities::Model> {
        self.vulnerability_repo().resolve(id, resolver_id).await
    }

    pub async fn delete_vulnerability(&self, id: i32) -> Result<bool> {
        self.vulnerability_repo().delete(id).await
    }

    pub async fn count_vulnerabilities_reported_by(&self, user_id: i32) -> Result<u64> {
        self.vulnerability_repo().count_reported_by(user_id).await
    }

    pub async fn count_vulnerabilities_resolved_by(&self, user_id: i32) -> Result<u64> {
        self.vulnerability_repo().count_resolved_by(user_id).await
    }

    pub async fn count_vulnerabilities(&self) -> Result<u64> {
        self.vulnerability_repo().count().await
    }

    pub async fn count_open_vulnerabilities(&self) -> Result<u64> {
        self.vulnerability_repo().count_open().await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub async fn insert_report(
        &self,
        user_id: i32,
        vulnerability_id: i32,
    ) -> Result<Option<reports::Model>> {
        self.report_repo().try_insert(user_id, vulnerability_id).await
    }

    pub async fn get_report(&self, id: i32) -> Result<Option<reports::Model>> {
        self.report_repo().get(id).await
    }

    pub async fn find_report_for(
        &self,
        user_id: i32,
        vulnerability_id: i32,
    ) -> Result<Option<reports::Model>> {
        self.report_repo().find_for(user_id, vulnerability_id).await
    }

    pub async fn list_reports_by_user(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<reports::Model>, u64)> {
        self.report_repo()
            .list_by_user(user_id, page, page_size)
            .await
    }

    pub async fn update_report_status(
        &self,
        id: i32,
        status: VulnStatus,
    ) -> Result<reports::Model> {
        self.report_repo().update_status(id, status).await
    }

    pub async fn delete_report(&self, id: i32) -> Result<bool> {
        self.report_repo().delete(id).await
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    pub async fn insert_review(
        &self,
        user_id: i32,
        vulnerability_id: Option<i32>,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Option<reviews::Model>> {
        self.review_repo()
            .try_insert(user_id, vulnerability_id, rating, comment)
            .await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<reviews::Model>> {
        self.review_repo().get(id).await
    }

    pub async fn list_reviews(
        &self,
        page: u64,
        page_size: u64,
        vulnerability_id: Option<i32>,
    ) -> Result<(Vec<reviews::Model>, u64)> {
        self.review_repo()
            .list(page, page_size, vulnerability_id)
            .await
    }

    pub async fn update_review(
        &self,
        id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<reviews::Model> {
        self.review_repo().update(id, rating, comment).await
    }

    pub async fn delete_review(&self, id: i32) -> Result<bool> {
        self.review_repo().delete(id).await
    }

    pub async fn count_reviews_by_user(&self, user_id: i32) -> Result<u64> {
        self.review_repo().count_by_user(user_id).await
    }

    // ------------------------------------------------------------------
    // Quests
    // ------------------------------------------------------------------

    pub async fn list_active_quests(&self) -> Result<Vec<quests::Model>> {
        self.quest_repo().list_active().await
    }

    pub async fn get_quest(&self, id: i32) -> Result<Option<quests::Model>> {
        self.quest_repo().get(id).await
    }

    pub async fn quest_completed(&self, user_id: i32, quest_id: i32) -> Result<bool> {
        self.quest_repo().is_completed(user_id, quest_id).await
    }

    pub async fn insert_quest_completion(
        &self,
        user_id: i32,
        quest_id: i32,
        damage_dealt: i32,
    ) -> Result<Option<user_quests::Model>> {
        self.quest_repo()
            .try_insert_completion(user_id, quest_id, damage_dealt)
            .await
    }

    pub async fn quest_completions_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_quests::Model, Option<quests::Model>)>> {
        self.quest_repo().completions_by_user(user_id).await
    }

    pub async fn count_quests_completed_by(&self, user_id: i32) -> Result<u64> {
        self.quest_repo().count_completed_by(user_id).await
    }

    pub async fn count_active_quests(&self) -> Result<u64> {
        self.quest_repo().count_active().await
    }

    // ------------------------------------------------------------------
    // Achievements
    // ------------------------------------------------------------------

    pub async fn list_achievements(&self) -> Result<Vec<achievements::Model>> {
        self.achievement_repo().all().await
    }

    pub async fn unlockable_achievements(
        &self,
        user_id: i32,
        metric: MetricType,
        value: i32,
    ) -> Result<Vec<achievements::Model>> {
        self.achievement_repo()
            .unlockable(user_id, metric, value)
            .await
    }

    pub async fn unlock_achievement(&self, user_id: i32, achievement_id: i32) -> Result<bool> {
        self.achievement_repo()
            .try_unlock(user_id, achievement_id)
            .await
    }

    pub async fn achievements_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_achievements::Model, Option<achievements::Model>)>> {
        self.achievement_repo().unlocked_by_user(user_id).await
    }

    // ------------------------------------------------------------------
    // Activity log
    // ------------------------------------------------------------------

    pub async fn log_activity(
        &self,
        user_id: i32,
        action_type: ActionType,
        details: &serde_json::Value,
    ) -> Result<()> {
        self.activity_repo().add(user_id, action_type, details).await
    }

    pub async fn activity_for_user(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<activity_log::Model>, u64)> {
        self.activity_repo().for_user(user_id, page, page_size).await
    }

    pub async fn recent_activity(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<activity_log::Model>, u64)> {
        self.activity_repo().recent(page, page_size).await
    }
}
