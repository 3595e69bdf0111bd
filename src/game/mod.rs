//! Pure game mechanics: leveling arithmetic and the quest battle loop.
//!
//! Nothing in here touches the database; the services layer persists the
//! results these functions produce.

pub mod battle;
pub mod experience;

pub use battle::{BattleAction, BattleOutcome, simulate_battle};
pub use experience::{ExperienceGain, apply_experience, level_threshold, title_for_level};
