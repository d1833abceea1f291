use chrono::{Datelike, Weekday};
use gtfs_structures::{Calendar, CalendarDate, Exception};
use serde::{Deserialize, Serialize};

/// the day of the week whose service is sampled. a typical weekday is used rather
/// than a calendar date so that a feed can be analyzed without picking a date within
/// its validity range.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceDay {
    pub weekday: Weekday,
}

impl Default for ServiceDay {
    fn default() -> Self {
        ServiceDay {
            weekday: Weekday::Wed,
        }
    }
}

impl ServiceDay {
    pub fn new(weekday: Weekday) -> ServiceDay {
        ServiceDay { weekday }
    }

    /// true if a service runs on this weekday, either through its calendar.txt weekday
    /// flag or through any calendar_dates.txt addition falling on this weekday.
    pub fn runs(&self, calendar: Option<&Calendar>, calendar_dates: &[CalendarDate]) -> bool {
        let scheduled = calendar.map(|c| self.flag(c)).unwrap_or(false);
        scheduled
            || calendar_dates
                .iter()
                .any(|cd| cd.exception_type == Exception::Added && cd.date.weekday() == self.weekday)
    }

    fn flag(&self, calendar: &Calendar) -> bool {
        match self.weekday {
            Weekday::Mon => calendar.monday,
            Weekday::Tue => calendar.tuesday,
            Weekday::Wed => calendar.wednesday,
            Weekday::Thu => calendar.thursday,
            Weekday::Fri => calendar.friday,
            Weekday::Sat => calendar.saturday,
            Weekday::Sun => calendar.sunday,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ServiceDay;
    use chrono::{NaiveDate, Weekday};
    use gtfs_structures::{Calendar, CalendarDate, Exception};

    fn weekday_calendar() -> Calendar {
        Calendar {
            id: String::from("wk"),
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        }
    }

    fn added(date: NaiveDate) -> CalendarDate {
        CalendarDate {
            service_id: String::from("special"),
            date,
            exception_type: Exception::Added,
        }
    }

    #[test]
    fn test_calendar_flag() {
        let calendar = weekday_calendar();
        assert!(ServiceDay::new(Weekday::Wed).runs(Some(&calendar), &[]));
        assert!(!ServiceDay::new(Weekday::Sun).runs(Some(&calendar), &[]));
    }

    #[test]
    fn test_calendar_dates_addition() {
        // 2025-03-05 is a wednesday, 2025-03-08 a saturday
        let wednesday = added(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        let saturday = added(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
        let day = ServiceDay::default();
        assert!(day.runs(None, &[wednesday]));
        assert!(!day.runs(None, &[saturday]));
        assert!(!day.runs(None, &[]));
    }
}
