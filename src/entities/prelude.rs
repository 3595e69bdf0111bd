pub use super::achievements::Entity as Achievements;
pub use super::activity_log::Entity as ActivityLog;
pub use super::quests::Entity as Quests;
pub use super::reports::Entity as Reports;
pub use super::reviews::Entity as Reviews;
pub use super::user_achievements::Entity as UserAchievements;
pub use super::user_quests::Entity as UserQuests;
pub use super::users::Entity as Users;
pub use super::vulnerabilities::Entity as Vulnerabilities;
