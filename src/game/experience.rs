//! Experience ledger: pure leveling arithmetic.
//!
//! All persistence lives with the caller; these functions only convert
//! (level, exp, delta) into a normalized (level, exp) pair.

use anyhow::{Result, bail};

use crate::constants::leveling::EXP_PER_LEVEL;

/// Outcome of applying an experience delta to a user's progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceGain {
    pub level: i32,
    pub exp: i32,
    pub leveled_up: bool,
    pub levels_gained: i32,
}

/// Experience required to advance from `level` to `level + 1`.
#[must_use]
pub const fn level_threshold(level: i32) -> i32 {
    level * EXP_PER_LEVEL
}

/// Adds `delta` experience and consumes thresholds until the remainder is
/// below the current level's requirement. The threshold is re-evaluated
/// against the just-incremented level each iteration, so large rewards can
/// clear several levels in one call.
///
/// Negative deltas are rejected: no reward source produces one, and a
/// negative value reaching this point is a caller bug.
pub fn apply_experience(current_level: i32, current_exp: i32, delta: i32) -> Result<ExperienceGain> {
    if current_level < 1 {
        bail!("Level must be >= 1, got {current_level}");
    }
    if current_exp < 0 {
        bail!("Experience must be >= 0, got {current_exp}");
    }
    if delta < 0 {
        bail!("Experience delta must be >= 0, got {delta}");
    }

    let mut level = current_level;
    let mut exp = current_exp + delta;
    let mut levels_gained = 0;

    while exp >= level_threshold(level) {
        exp -= level_threshold(level);
        level += 1;
        levels_gained += 1;
    }

    Ok(ExperienceGain {
        level,
        exp,
        leveled_up: levels_gained > 0,
        levels_gained,
    })
}

/// Rank title shown next to a user's name, by level band.
#[must_use]
pub const fn title_for_level(level: i32) -> &'static str {
    match level {
        i32::MIN..=2 => "Novice Hunter",
        3..=5 => "Bug Tracker",
        6..=9 => "Exploit Analyst",
        10..=14 => "Vulnerability Slayer",
        15..=19 => "Security Veteran",
        20..=29 => "Elite Researcher",
        _ => "Legendary Guardian",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_level_up_below_threshold() {
        let gain = apply_experience(1, 0, 999).unwrap();
        assert_eq!(gain.level, 1);
        assert_eq!(gain.exp, 999);
        assert!(!gain.leveled_up);
        assert_eq!(gain.levels_gained, 0);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let gain = apply_experience(1, 0, 1000).unwrap();
        assert_eq!(gain.level, 2);
        assert_eq!(gain.exp, 0);
        assert!(gain.leveled_up);
        assert_eq!(gain.levels_gained, 1);
    }

    #[test]
    fn test_multi_level_jump() {
        // 1 -> 2 costs 1000, 2 -> 3 costs 2000: 2500 stops at level 2 with
        // 1500 left over.
        let gain = apply_experience(1, 0, 2500).unwrap();
        assert_eq!(gain.level, 2);
        assert_eq!(gain.exp, 1500);
        assert!(gain.leveled_up);
        assert_eq!(gain.levels_gained, 1);

        let gain = apply_experience(1, 0, 3000).unwrap();
        assert_eq!(gain.level, 3);
        assert_eq!(gain.exp, 0);
        assert_eq!(gain.levels_gained, 2);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let gain = apply_experience(4, 123, 0).unwrap();
        assert_eq!(gain.level, 4);
        assert_eq!(gain.exp, 123);
        assert!(!gain.leveled_up);
    }

    #[test]
    fn test_negative_delta_rejected() {
        assert!(apply_experience(1, 0, -1).is_err());
    }

    #[test]
    fn test_result_always_normalized() {
        for delta in [0, 1, 999, 1000, 4999, 50_000] {
            let gain = apply_experience(1, 800, delta).unwrap();
            assert!(gain.exp < level_threshold(gain.level));
            assert!(gain.level >= 1);
        }
    }

    #[test]
    fn test_cascade_example() {
        // Level-1 user at 800 exp receiving a 500 achievement reward crosses
        // the 1000 threshold and carries 300 into level 2.
        let gain = apply_experience(1, 800, 500).unwrap();
        assert_eq!(gain.level, 2);
        assert_eq!(gain.exp, 300);
        assert!(gain.leveled_up);
    }

    #[test]
    fn test_titles_by_band() {
        assert_eq!(title_for_level(1), "Novice Hunter");
        assert_eq!(title_for_level(10), "Vulnerability Slayer");
        assert_eq!(title_for_level(42), "Legendary Guardian");
    }
}
