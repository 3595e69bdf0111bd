pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, Registration};
pub use auth_service_impl::SeaOrmAuthService;

pub mod reward_service;
pub mod reward_service_impl;
pub use reward_service::{
    AchievementProgress, RewardError, RewardOutcome, RewardService, UnlockedAchievement,
};
pub use reward_service_impl::SeaOrmRewardService;

pub mod vulnerability_service;
pub mod vulnerability_service_impl;
pub use vulnerability_service::{
    NewVulnerability, ReportedVulnerability, ResolvedVulnerability, VulnerabilityError,
    VulnerabilityService,
};
pub use vulnerability_service_impl::SeaOrmVulnerabilityService;

pub mod quest_service;
pub mod quest_service_impl;
pub use quest_service::{QuestAttempt, QuestError, QuestService};
pub use quest_service_impl::SeaOrmQuestService;

pub mod review_service;
pub mod review_service_impl;
pub use review_service::{NewReview, ReviewError, ReviewService};
pub use review_service_impl::SeaOrmReviewService;
