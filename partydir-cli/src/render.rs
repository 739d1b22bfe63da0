//! Terminal rendering for partydir types.

use chrono::{NaiveDate, Utc};
use owo_colors::OwoColorize;
use partydir_core::constants::FEATURED_TZ;
use partydir_core::{FeaturedWindow, Party};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Party {
    fn render(&self) -> String {
        let time = self.start_time.as_deref().unwrap_or("--:--");
        let source = format!("[{}]", self.source_file.as_deref().unwrap_or("?"));

        let mut line = format!("  {:>5} {} {}", time, self.title, format!("@ {}", self.venue).dimmed());
        if !self.artists.is_empty() {
            line.push_str(&format!(" {}", self.artists.join(", ").cyan()));
        }
        line.push_str(&format!(" {}", source.dimmed()));
        line
    }
}

impl Render for FeaturedWindow {
    fn render(&self) -> String {
        format!("Featured {}: {}", self.week, self.range)
    }
}

/// Render parties grouped under a heading per day.
pub fn render_by_day(parties: &[Party]) -> String {
    let mut lines = Vec::new();
    let mut current_label: Option<String> = None;

    for party in parties {
        let label = date_label(party);

        if current_label.as_ref() != Some(&label) {
            if current_label.is_some() {
                lines.push(String::new());
            }
            lines.push(label.bold().to_string());
            current_label = Some(label);
        }

        lines.push(party.render());
    }

    lines.join("\n")
}

/// Human-readable label for a party's day (e.g. "Today", "Tomorrow", "Fri May 30")
fn date_label(party: &Party) -> String {
    match party.day() {
        Some(day) => day_label(day, Utc::now().with_timezone(&FEATURED_TZ).date_naive()),
        None => format!("Unknown date ({})", party.date),
    }
}

fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    match (day - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => day.format("%a %b %-d %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_label() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 29).unwrap();

        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(), today),
            "Sat May 31 2025"
        );
    }
}
