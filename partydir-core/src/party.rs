//! The party record as stored in the data directory.
//!
//! Records are loosely shaped on disk: any field may be missing or `null`.
//! Deserialization is lenient so that aggregation never drops a record for a
//! missing optional field. Keys this crate doesn't know about are kept in
//! `extra` and written back untouched.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::constants::SCRAPED_URL_MARKER;
use crate::stable_id::stable_id;

/// A single party listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: String,
    /// `YYYY-MM-DD`, occasionally a full date-time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// `HH:MM`, 24-hour clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // Provenance, filled in during aggregation
    /// File the winning version of this record came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Effective timestamp of `source_file`
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

impl Party {
    pub fn new(title: &str, venue: &str, date: &str) -> Self {
        Party {
            id: String::new(),
            title: title.to_string(),
            venue: venue.to_string(),
            date: date.to_string(),
            start_time: None,
            artists: Vec::new(),
            url: None,
            source_file: None,
            last_modified: None,
            extra: Map::new(),
        }
    }

    /// The id carried in the source data, if any. Blank ids count as absent.
    pub fn explicit_id(&self) -> Option<&str> {
        let id = self.id.trim();
        if id.is_empty() { None } else { Some(id) }
    }

    /// The id derived from title, date and venue.
    pub fn stable_id(&self) -> String {
        stable_id(&self.title, &self.date, &self.venue)
    }

    /// Explicit ids are authoritative; only missing ones are derived.
    pub fn resolved_id(&self) -> String {
        match self.explicit_id() {
            Some(id) => id.to_string(),
            None => self.stable_id(),
        }
    }

    /// Fill in `id` if the record doesn't carry one.
    pub fn with_resolved_id(mut self) -> Self {
        self.id = self.resolved_id();
        self
    }

    /// Stamp the record with the file it was read from.
    ///
    /// Any provenance keys present in the source data are dropped.
    pub fn with_provenance(mut self, source_file: &str, last_modified: DateTime<Utc>) -> Self {
        self.extra.remove("sourceFile");
        self.extra.remove("lastModified");
        self.source_file = Some(source_file.to_string());
        self.last_modified = Some(last_modified);
        self
    }

    /// Whether this record points at the third-party aggregator and is
    /// therefore considered lower fidelity than curated data.
    pub fn is_scraped(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.contains(SCRAPED_URL_MARKER))
    }

    /// The calendar day of this party, or None if `date` can't be parsed.
    ///
    /// Date-times are taken at their written wall-clock day, without
    /// converting between offsets.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    /// Required fields that are empty, in display order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let start_time = self.start_time.as_deref().unwrap_or_default();

        [
            ("title", self.title.as_str()),
            ("venue", self.venue.as_str()),
            ("date", self.date.as_str()),
            ("startTime", start_time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.title, self.venue, self.date)
    }
}

/// Parse a party date into a calendar day.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}
