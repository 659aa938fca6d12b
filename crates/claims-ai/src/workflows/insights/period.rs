use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Relative reporting window applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportingPeriod {
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
    #[default]
    #[serde(rename = "6months")]
    Last6Months,
    #[serde(rename = "12months")]
    Last12Months,
    #[serde(rename = "all")]
    AllTime,
}

impl ReportingPeriod {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Last30Days => "30days",
            Self::Last90Days => "90days",
            Self::Last6Months => "6months",
            Self::Last12Months => "12months",
            Self::AllTime => "all",
        }
    }

    const fn days(self) -> Option<i64> {
        match self {
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::Last6Months => Some(180),
            Self::Last12Months => Some(365),
            Self::AllTime => None,
        }
    }

    /// Inclusive lower bound relative to `now`; `None` means unbounded.
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }

    pub fn contains(self, submitted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start(now).map_or(true, |start| submitted_at >= start)
    }

    /// Missing tokens fall back to six months; unknown tokens are rejected.
    pub fn parse_or_default(token: Option<&str>) -> Result<Self, PeriodParseError> {
        match token.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ReportingPeriod {
    type Err = PeriodParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "30days" => Ok(Self::Last30Days),
            "90days" => Ok(Self::Last90Days),
            "6months" => Ok(Self::Last6Months),
            "12months" => Ok(Self::Last12Months),
            "all" => Ok(Self::AllTime),
            _ => Err(PeriodParseError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reporting period '{0}' (expected 30days, 90days, 6months, 12months or all)")]
pub struct PeriodParseError(pub String);
