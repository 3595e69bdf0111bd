use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Progress metric an achievement requirement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    VulnerabilitiesReported,
    VulnerabilitiesResolved,
    QuestsCompleted,
    LevelReached,
    ReviewsGiven,
}

impl MetricType {
    pub const ALL: [Self; 5] = [
        Self::VulnerabilitiesReported,
        Self::VulnerabilitiesResolved,
        Self::QuestsCompleted,
        Self::LevelReached,
        Self::ReviewsGiven,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VulnerabilitiesReported => "vulnerabilities_reported",
            Self::VulnerabilitiesResolved => "vulnerabilities_resolved",
            Self::QuestsCompleted => "quests_completed",
            Self::LevelReached => "level_reached",
            Self::ReviewsGiven => "reviews_given",
        }
    }
}

impl FromStr for MetricType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vulnerabilities_reported" => Ok(Self::VulnerabilitiesReported),
            "vulnerabilities_resolved" => Ok(Self::VulnerabilitiesResolved),
            "quests_completed" => Ok(Self::QuestsCompleted),
            "level_reached" => Ok(Self::LevelReached),
            "reviews_given" => Ok(Self::ReviewsGiven),
            other => Err(anyhow::anyhow!("Unknown requirement type: {other}")),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action types recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    VulnerabilityReported,
    VulnerabilityResolved,
    QuestCompleted,
    QuestFailed,
    ReviewPosted,
    LevelUp,
    AchievementUnlocked,
    UserRegistered,
}

impl ActionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VulnerabilityReported => "vulnerability_reported",
            Self::VulnerabilityResolved => "vulnerability_resolved",
            Self::QuestCompleted => "quest_completed",
            Self::QuestFailed => "quest_failed",
            Self::ReviewPosted => "review_posted",
            Self::LevelUp => "level_up",
            Self::AchievementUnlocked => "achievement_unlocked",
            Self::UserRegistered => "user_registered",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parse_round_trip() {
        for metric in MetricType::ALL {
            assert_eq!(metric.as_str().parse::<MetricType>().unwrap(), metric);
        }
        assert!("bosses_defeated".parse::<MetricType>().is_err());
    }
}
