use serde::{Deserialize, Serialize};

/// Named time range selector for leaderboard and dashboard queries.
///
/// The concrete `[start, end)` interval is derived by the window resolver
/// from the selector and the evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Today,
    Week,
    Month,
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::All => "all",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(TimeRange::Today),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "all" => Ok(TimeRange::All),
            other => Err(format!("unknown time range: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_known_ranges() {
        assert_eq!(TimeRange::from_str("today").unwrap(), TimeRange::Today);
        assert_eq!(TimeRange::from_str("week").unwrap(), TimeRange::Week);
        assert_eq!(TimeRange::from_str("month").unwrap(), TimeRange::Month);
        assert_eq!(TimeRange::from_str("all").unwrap(), TimeRange::All);
    }

    #[test]
    fn test_parse_unknown_range() {
        assert!(TimeRange::from_str("year").is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(serde_json::to_string(&TimeRange::Week).unwrap(), "\"week\"");
        let parsed: TimeRange = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(parsed, TimeRange::Month);
    }
}
