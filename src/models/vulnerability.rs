use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a reported vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Experience the resolver earns when no explicit reward is set.
    #[must_use]
    pub const fn default_exp_reward(self) -> i32 {
        match self {
            Self::Low => 50,
            Self::Medium => 100,
            Self::High => 200,
            Self::Critical => 400,
        }
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(anyhow::anyhow!("Unknown severity: {other}")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state shared by vulnerabilities and the reports that track them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl VulnStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for VulnStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(anyhow::anyhow!("Unknown status: {other}")),
        }
    }
}

impl fmt::Display for VulnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip() {
        for s in ["low", "medium", "high", "critical"] {
            assert_eq!(s.parse::<Severity>().unwrap().as_str(), s);
        }
        assert!("extreme".parse::<Severity>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["open", "in_progress", "resolved", "closed"] {
            assert_eq!(s.parse::<VulnStatus>().unwrap().as_str(), s);
        }
        assert!("fixed".parse::<VulnStatus>().is_err());
    }
}
