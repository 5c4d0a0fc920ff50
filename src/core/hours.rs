//! Business-hours schedule evaluation.
//!
//! A schedule holds one entry per weekday with an enabled flag and a local
//! start/end time. A moment is "in hours" when its weekday is enabled and the
//! local time falls within `[start, end)`. A disabled weekday is always
//! out-of-hours, and a schedule entry that fails to parse is treated the same
//! way so that degraded configuration falls toward voicemail, never toward
//! letting a call through.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Schedule for a single weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Whether this weekday counts as business hours at all
    pub enabled: bool,
    /// Local opening time, `"HH:MM"`
    pub start: String,
    /// Local closing time, `"HH:MM"`; the closing minute itself is out-of-hours
    pub end: String,
}

impl DaySchedule {
    /// A disabled day; start/end are irrelevant but kept well-formed.
    #[must_use]
    pub fn closed() -> Self {
        Self {
            enabled: false,
            start: "09:00".to_string(),
            end: "17:00".to_string(),
        }
    }

    /// An enabled day with the given local times.
    #[must_use]
    pub fn open(start: &str, end: &str) -> Self {
        Self {
            enabled: true,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Parses the start/end strings, returning None when either is malformed.
    #[must_use]
    pub fn resolved(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;
        Some((start, end))
    }
}

/// Per-weekday business-hours schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// Monday schedule
    pub monday: DaySchedule,
    /// Tuesday schedule
    pub tuesday: DaySchedule,
    /// Wednesday schedule
    pub wednesday: DaySchedule,
    /// Thursday schedule
    pub thursday: DaySchedule,
    /// Friday schedule
    pub friday: DaySchedule,
    /// Saturday schedule
    pub saturday: DaySchedule,
    /// Sunday schedule
    pub sunday: DaySchedule,
}

impl Default for BusinessHours {
    /// Weekdays 09:00-17:00, weekend closed.
    fn default() -> Self {
        Self {
            monday: DaySchedule::open("09:00", "17:00"),
            tuesday: DaySchedule::open("09:00", "17:00"),
            wednesday: DaySchedule::open("09:00", "17:00"),
            thursday: DaySchedule::open("09:00", "17:00"),
            friday: DaySchedule::open("09:00", "17:00"),
            saturday: DaySchedule::closed(),
            sunday: DaySchedule::closed(),
        }
    }
}

impl BusinessHours {
    /// Returns the schedule entry for the given weekday.
    #[must_use]
    pub const fn schedule_for(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Classifies a local timestamp as in-hours or out-of-hours.
    ///
    /// In-hours means the weekday is enabled and the local time is within
    /// `[start, end)`. Malformed start/end strings classify as out-of-hours
    /// with a warning.
    #[must_use]
    pub fn is_within(&self, local: NaiveDateTime) -> bool {
        let day = self.schedule_for(local.weekday());
        if !day.enabled {
            return false;
        }

        match day.resolved() {
            Some((start, end)) => {
                let time = local.time();
                time >= start && time < end
            }
            None => {
                warn!(
                    weekday = %local.weekday(),
                    start = %day.start,
                    end = %day.end,
                    "malformed business-hours entry, treating as out-of-hours"
                );
                false
            }
        }
    }

    /// Parses a schedule from its JSON column representation.
    ///
    /// Returns None when the blob does not match the expected shape; callers
    /// substitute the default schedule and log.
    #[must_use]
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }

    /// Serializes the schedule for storage in the JSON column.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        // A struct of bools and strings cannot fail to serialize
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn test_default_schedule_weekday_in_hours() {
        let hours = BusinessHours::default();
        // Tuesday 2024-06-04 10:00
        assert!(hours.is_within(at(2024, 6, 4, 10, 0)));
    }

    #[test]
    fn test_default_schedule_weekend_out_of_hours() {
        let hours = BusinessHours::default();
        // Sunday 2024-06-09, any time of day
        assert!(!hours.is_within(at(2024, 6, 9, 10, 0)));
        assert!(!hours.is_within(at(2024, 6, 9, 0, 0)));
        assert!(!hours.is_within(at(2024, 6, 9, 23, 59)));
    }

    #[test]
    fn test_start_inclusive_end_exclusive() {
        let hours = BusinessHours::default();
        // Monday 2024-06-03
        assert!(hours.is_within(at(2024, 6, 3, 9, 0)));
        assert!(hours.is_within(at(2024, 6, 3, 16, 59)));
        assert!(!hours.is_within(at(2024, 6, 3, 17, 0)));
        assert!(!hours.is_within(at(2024, 6, 3, 8, 59)));
    }

    #[test]
    fn test_disabled_weekday_always_out_of_hours() {
        let mut hours = BusinessHours::default();
        hours.wednesday.enabled = false;
        // Wednesday 2024-06-05, inside what would otherwise be open hours
        assert!(!hours.is_within(at(2024, 6, 5, 12, 0)));
    }

    #[test]
    fn test_malformed_times_treated_out_of_hours() {
        let mut hours = BusinessHours::default();
        hours.monday.start = "not-a-time".to_string();
        assert!(!hours.is_within(at(2024, 6, 3, 10, 0)));
    }

    #[test]
    fn test_json_round_trip() {
        let hours = BusinessHours::default();
        let parsed = BusinessHours::from_json(&hours.to_json());
        assert_eq!(parsed, Some(hours));
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let raw = serde_json::json!({"monday": "always"});
        assert!(BusinessHours::from_json(&raw).is_none());
    }
}
