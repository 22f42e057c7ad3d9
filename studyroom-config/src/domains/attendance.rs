//! Attendance engine configuration
//!
//! The zone offset drives every day/week/month boundary computation, so it
//! lives here as explicit configuration rather than ambient state.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_in_range, validate_positive, Validatable};

/// Attendance engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Zone offset from UTC in whole hours, applied to all window
    /// boundaries (UTC+9 in the reference deployment)
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Number of whole local days in the dashboard trend window
    #[serde(default = "default_trend_days")]
    pub trend_days: u32,

    /// Default leaderboard size when the caller does not ask for one
    #[serde(default = "default_leaderboard_top")]
    pub default_leaderboard_top: usize,
}

impl AttendanceConfig {
    /// The configured zone as a chrono offset
    pub fn zone_offset(&self) -> FixedOffset {
        // validate() bounds the hours within FixedOffset's accepted range;
        // an unvalidated out-of-range value falls back to UTC
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            trend_days: default_trend_days(),
            default_leaderboard_top: default_leaderboard_top(),
        }
    }
}

impl Validatable for AttendanceConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_in_range(self.utc_offset_hours, -12, 14, "utc_offset_hours", self.domain_name())?;
        validate_positive(self.trend_days, "trend_days", self.domain_name())?;
        validate_positive(self.default_leaderboard_top, "default_leaderboard_top", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "attendance"
    }
}

// Default value functions
fn default_utc_offset_hours() -> i32 {
    9
}

fn default_trend_days() -> u32 {
    21
}

fn default_leaderboard_top() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_defaults() {
        let config = AttendanceConfig::default();
        assert_eq!(config.utc_offset_hours, 9);
        assert_eq!(config.trend_days, 21);
        assert_eq!(config.default_leaderboard_top, 20);
        assert_eq!(config.zone_offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_offset_bounds() {
        let mut config = AttendanceConfig::default();
        config.utc_offset_hours = 15;
        assert!(config.validate().is_err());
        config.utc_offset_hours = -13;
        assert!(config.validate().is_err());
        config.utc_offset_hours = -5;
        assert!(config.validate().is_ok());
    }
}
