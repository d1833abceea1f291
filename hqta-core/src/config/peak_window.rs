use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{error::QualificationError, model::SECONDS_PER_DAY};

/// a time-of-day window used for frequency sampling. bounds are inclusive.
/// the duration is configured separately from the bounds since it is the
/// statutory denominator of the service interval.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PeakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_minutes: f64,
}

impl PeakWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, duration_minutes: f64) -> PeakWindow {
        PeakWindow {
            start,
            end,
            duration_minutes,
        }
    }

    /// 07:00:00 - 09:00:00, 120 minutes
    pub fn default_am() -> PeakWindow {
        PeakWindow::from_hours(7, 9)
    }

    /// 16:00:00 - 18:00:00, 120 minutes
    pub fn default_pm() -> PeakWindow {
        PeakWindow::from_hours(16, 18)
    }

    fn from_hours(start: u32, end: u32) -> PeakWindow {
        let start_time = NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default();
        let end_time = NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default();
        PeakWindow::new(start_time, end_time, ((end - start) * 60) as f64)
    }

    pub fn start_seconds(&self) -> u32 {
        self.start.num_seconds_from_midnight()
    }

    pub fn end_seconds(&self) -> u32 {
        self.end.num_seconds_from_midnight()
    }

    /// true if the service-day time falls inside this window. times at or past
    /// 24:00:00 belong to the next calendar day and never match.
    pub fn contains(&self, seconds: u32) -> bool {
        seconds < SECONDS_PER_DAY && self.start_seconds() <= seconds && seconds <= self.end_seconds()
    }

    pub fn validate(&self, name: &str) -> Result<(), QualificationError> {
        if self.end <= self.start {
            return Err(QualificationError::InvalidConfig(format!(
                "{name} peak window ends ({}) at or before it starts ({})",
                self.end, self.start
            )));
        }
        if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
            return Err(QualificationError::InvalidConfig(format!(
                "{name} peak window duration must be positive, found {}",
                self.duration_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::PeakWindow;
    use chrono::NaiveTime;

    #[test]
    fn test_contains_is_inclusive_and_excludes_next_day() {
        let am = PeakWindow::default_am();
        assert!(am.contains(7 * 3600));
        assert!(am.contains(9 * 3600));
        assert!(!am.contains(9 * 3600 + 1));
        assert!(!am.contains(6 * 3600 + 3599));
        // 31:00:00 is 07:00:00 on the following day and is not wrapped
        assert!(!am.contains(31 * 3600));
        assert_eq!(am.duration_minutes, 120.0);
    }

    #[test]
    fn test_validate() {
        assert!(PeakWindow::default_pm().validate("pm").is_ok());
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        assert!(PeakWindow::new(start, end, 120.0).validate("am").is_err());
        assert!(PeakWindow::new(end, start, 0.0).validate("am").is_err());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"start": "06:30:00", "end": "09:30:00", "duration_minutes": 180}"#;
        let window: PeakWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window.start_seconds(), 6 * 3600 + 1800);
        assert_eq!(window.end_seconds(), 9 * 3600 + 1800);
    }
}
