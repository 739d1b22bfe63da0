//! The "featured this week" window.
//!
//! The window flips on Monday at 13:00 Berlin time: before that the
//! weekend just past (Friday to Sunday) is featured, from then on the
//! whole current week (Monday to Sunday).

use std::fmt;

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::constants::{FEATURED_CUTOVER_HOUR, FEATURED_TZ};
use crate::date_range::DateRange;
use crate::party::Party;

/// Which part of the calendar is currently featured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedWeek {
    /// Monday through Sunday of the current week.
    CurrentWeek,
    /// Friday through Sunday before the current week's Monday.
    PriorWeekend,
}

impl fmt::Display for FeaturedWeek {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeaturedWeek::CurrentWeek => write!(f, "this week"),
            FeaturedWeek::PriorWeekend => write!(f, "last weekend"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedWindow {
    pub week: FeaturedWeek,
    pub range: DateRange,
}

impl FeaturedWindow {
    /// The window in effect at `now`, evaluated in Berlin civil time.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::at_in(now, &FEATURED_TZ)
    }

    /// The window in effect at `now`, evaluated in the civil time of `tz`.
    pub fn at_in<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        let local = now.with_timezone(tz);
        let today = local.date_naive();
        let monday = today - Duration::days(today.weekday().num_days_from_monday().into());

        // Wall-clock comparison: DST switches happen on Sunday nights, so
        // Monday 13:00 always exists exactly once.
        let past_cutover = today > monday || local.hour() >= FEATURED_CUTOVER_HOUR;

        if past_cutover {
            FeaturedWindow {
                week: FeaturedWeek::CurrentWeek,
                range: DateRange::new(monday, monday + Duration::days(6)),
            }
        } else {
            FeaturedWindow {
                week: FeaturedWeek::PriorWeekend,
                range: DateRange::new(monday - Duration::days(3), monday - Duration::days(1)),
            }
        }
    }

    pub fn includes(&self, party: &Party) -> bool {
        self.range.includes(party)
    }

    /// Parties within the window, in chronological order.
    pub fn select(&self, parties: Vec<Party>) -> Vec<Party> {
        let mut featured: Vec<Party> = parties.into_iter().filter(|p| self.includes(p)).collect();
        featured.sort_by_key(|p| p.day());
        featured
    }
}

impl fmt::Display for FeaturedWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.range, self.week)
    }
}
