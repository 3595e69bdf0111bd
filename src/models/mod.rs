pub mod progression;
pub mod quest;
pub mod vulnerability;

pub use progression::{ActionType, MetricType};
pub use quest::{Difficulty, QuestInfo};
pub use vulnerability::{Severity, VulnStatus};
