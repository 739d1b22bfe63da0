//! Inclusive calendar-day ranges for filtering parties.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

use crate::error::{PartyDirError, PartyDirResult};
use crate::party::Party;

/// Range of calendar days, both ends inclusive.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse optional `YYYY-MM-DD` bounds, as given on the command line.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> PartyDirResult<Self> {
        Ok(DateRange {
            from: from.map(parse_date).transpose()?,
            to: to.map(parse_date).transpose()?,
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }

    /// True if neither end is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether the party's date falls in the range.
    ///
    /// An unbounded range includes every party. Otherwise unparseable dates
    /// never match.
    pub fn includes(&self, party: &Party) -> bool {
        if self.is_unbounded() {
            return true;
        }
        party.day().is_some_and(|day| self.contains(day))
    }

    /// First instant of the range in `tz` (00:00 on `from`).
    pub fn start_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let day = self.from?;
        tz.from_local_datetime(&day.and_time(NaiveTime::MIN)).earliest()
    }

    /// Last instant of the range in `tz` (23:59:59.999 on `to`).
    pub fn end_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let day = self.to?;
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
        tz.from_local_datetime(&day.and_time(time)).latest()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bound = |d: Option<NaiveDate>| match d {
            Some(d) => d.format("%a %Y-%m-%d").to_string(),
            None => "open".to_string(),
        };
        write!(f, "{} to {}", bound(self.from), bound(self.to))
    }
}

fn parse_date(s: &str) -> PartyDirResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        PartyDirError::InvalidDate(format!("'{}'. Expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Europe::Berlin;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2025, 6, 2), date(2025, 6, 8));

        assert!(range.contains(date(2025, 6, 2)));
        assert!(range.contains(date(2025, 6, 8)));
        assert!(!range.contains(date(2025, 6, 1)));
        assert!(!range.contains(date(2025, 6, 9)));
    }

    #[test]
    fn test_unbounded_range() {
        let range = DateRange::from_args(None, Some("2025-06-08")).unwrap();

        assert!(range.contains(date(1999, 1, 1)));
        assert!(!range.contains(date(2025, 6, 9)));
    }

    #[test]
    fn test_from_args_rejects_bad_dates() {
        assert!(DateRange::from_args(Some("next friday"), None).is_err());
    }

    #[test]
    fn test_unbounded_range_includes_unparseable_dates() {
        let range = DateRange::default();

        assert!(range.includes(&Party::new("T", "V", "2025-06-01")));
        assert!(range.includes(&Party::new("T", "V", "soon")));
        assert!(range.includes(&Party::new("T", "V", "")));
    }

    #[test]
    fn test_bounded_range_excludes_unparseable_dates() {
        let half_open = DateRange::from_args(Some("2025-01-01"), None).unwrap();
        let closed = DateRange::new(date(2025, 6, 1), date(2025, 6, 1));

        for range in [half_open, closed] {
            assert!(range.includes(&Party::new("T", "V", "2025-06-01")));
            assert!(!range.includes(&Party::new("T", "V", "soon")));
            assert!(!range.includes(&Party::new("T", "V", "")));
        }
    }

    #[test]
    fn test_display() {
        let range = DateRange::new(date(2025, 5, 30), date(2025, 6, 1));

        assert_eq!(range.to_string(), "Fri 2025-05-30 to Sun 2025-06-01");
    }

    #[test]
    fn test_instants_in_timezone() {
        let range = DateRange::new(date(2025, 6, 2), date(2025, 6, 8));

        let start = range.start_in(&Berlin).unwrap();
        let end = range.end_in(&Berlin).unwrap();

        assert_eq!(start.naive_local(), date(2025, 6, 2).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end.date_naive(), date(2025, 6, 8));
        assert_eq!(end.nanosecond(), 999_000_000);
    }
}
