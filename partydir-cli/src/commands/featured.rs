use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use owo_colors::OwoColorize;
use partydir_core::constants::FEATURED_TZ;
use partydir_core::{FileOrdering, PartyDir};
use serde_json::json;

use crate::render::{Render, render_by_day};

pub fn run(dir: &PartyDir, ordering: &dyn FileOrdering, at: Option<&str>, json: bool) -> Result<()> {
    let now = match at {
        Some(s) => parse_instant(s)?,
        None => Utc::now(),
    };

    let (window, parties) = dir.featured(ordering, now)?;

    if json {
        let output = json!({
            "week": window.week,
            "from": window.range.from,
            "to": window.range.to,
            "start": window.range.start_in(&FEATURED_TZ).map(|dt| dt.to_rfc3339()),
            "end": window.range.end_in(&FEATURED_TZ).map(|dt| dt.to_rfc3339()),
            "parties": parties,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", window.render().bold());
    println!();

    if parties.is_empty() {
        println!("{}", "No parties featured".dimmed());
    } else {
        println!("{}", render_by_day(&parties));
    }

    Ok(())
}

/// RFC 3339, or a wall-clock time in Berlin.
fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .with_context(|| format!("Could not parse \"{}\". Expected RFC 3339 or YYYY-MM-DDTHH:MM", s))?;

    FEATURED_TZ
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("\"{}\" does not exist in Berlin time", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant_in_berlin_time() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();

        assert_eq!(parse_instant("2025-06-02T13:00").unwrap(), expected);
        assert_eq!(parse_instant("2025-06-02T13:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_instant("2025-06-02T11:00:00Z").unwrap(), expected);
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        assert!(parse_instant("monday lunch").is_err());
        // Skipped by the spring DST switch
        assert!(parse_instant("2025-03-30T02:30").is_err());
    }
}
