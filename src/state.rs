use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::config::Config;
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::services::{
    AuthService, QuestService, ReviewService, RewardService, SeaOrmAuthService,
    SeaOrmQuestService, SeaOrmReviewService, SeaOrmRewardService, SeaOrmVulnerabilityService,
    VulnerabilityService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub event_bus: broadcast::Sender<NotificationEvent>,

    pub auth_service: Arc<dyn AuthService>,

    pub reward_service: Arc<dyn RewardService>,

    pub vulnerability_service: Arc<dyn VulnerabilityService>,

    pub quest_service: Arc<dyn QuestService>,

    pub review_service: Arc<dyn ReviewService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::init_with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        Self::init_with_event_bus(config, event_bus).await
    }

    async fn init_with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let security = config.security.clone();
        let game = config.game.clone();
        let config_arc = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), security))
            as Arc<dyn AuthService + 'static>;

        // The reward service is the cascade entry point every action
        // service feeds into.
        let reward_service = Arc::new(SeaOrmRewardService::new(store.clone(), event_bus.clone()))
            as Arc<dyn RewardService + 'static>;

        let vulnerability_service = Arc::new(SeaOrmVulnerabilityService::new(
            store.clone(),
            reward_service.clone(),
            game.clone(),
            event_bus.clone(),
        )) as Arc<dyn VulnerabilityService + 'static>;

        let quest_service = Arc::new(SeaOrmQuestService::new(
            store.clone(),
            reward_service.clone(),
            event_bus.clone(),
        )) as Arc<dyn QuestService + 'static>;

        let review_service = Arc::new(SeaOrmReviewService::new(
            store.clone(),
            reward_service.clone(),
            game,
            event_bus.clone(),
        )) as Arc<dyn ReviewService + 'static>;

        Ok(Self {
            config: config_arc,
            store,
            event_bus,
            auth_service,
            reward_service,
            vulnerability_service,
            quest_service,
            review_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
