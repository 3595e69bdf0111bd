use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quest difficulty. Scales the boss damage rolls in the battle simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Nightmare,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Nightmare => "nightmare",
        }
    }

    /// Multiplier applied to boss damage rolls.
    #[must_use]
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Self::Easy => 0.7,
            Self::Medium => 1.0,
            Self::Hard => 1.5,
            Self::Nightmare => 2.0,
        }
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "nightmare" => Ok(Self::Nightmare),
            other => Err(anyhow::anyhow!("Unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quest data the battle simulator needs, decoupled from the database row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestInfo {
    pub id: i32,
    pub boss_name: String,
    pub floor_number: i32,
    pub difficulty: Difficulty,
    pub exp_reward: i32,
    pub health_points: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_multipliers() {
        assert!((Difficulty::Easy.damage_multiplier() - 0.7).abs() < f64::EPSILON);
        assert!((Difficulty::Medium.damage_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((Difficulty::Hard.damage_multiplier() - 1.5).abs() < f64::EPSILON);
        assert!((Difficulty::Nightmare.damage_multiplier() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("nightmare".parse::<Difficulty>().unwrap(), Difficulty::Nightmare);
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
