//! Domain events for the application.
//!
//! These events are sent via the event bus to notify connected clients of
//! progression changes as they happen.

use serde::Serialize;

/// Events sent to connected clients via SSE (Server-Sent Events).
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    VulnerabilityReported {
        vulnerability_id: i32,
        title: String,
        severity: String,
    },
    VulnerabilityResolved {
        vulnerability_id: i32,
        title: String,
        resolver: String,
    },

    QuestCompleted {
        quest_id: i32,
        boss_name: String,
        username: String,
        damage_dealt: i32,
    },

    LevelUp {
        user_id: i32,
        username: String,
        old_level: i32,
        new_level: i32,
    },

    AchievementUnlocked {
        user_id: i32,
        username: String,
        achievement: String,
        exp_reward: i32,
    },

    ReviewPosted {
        review_id: i32,
        rating: i32,
    },

    Error {
        message: String,
    },
    Info {
        message: String,
    },
}
