//! Validation of newly submitted parties.
//!
//! Submissions arrive as a small batch of parties plus the name of the file
//! they should be stored in. A batch is either accepted as a whole or
//! rejected with a human-readable reason. Accepted batches are handed to a
//! [`SubmissionSink`], which decides how they end up in the data directory.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::constants::{MANIFEST_FILE, MAX_SUBMISSION_EVENTS};
use crate::error::{PartyDirError, PartyDirResult};
use crate::party::Party;
use crate::partydir::PartyDir;

const ANONYMOUS: &str = "anonymous";

/// A batch of parties as submitted by a contributor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub events: Vec<Party>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, alias = "submitterEmail")]
    pub submitter: Option<String>,
}

/// A submission that passed validation. Every party carries its id.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedSubmission {
    pub events: Vec<Party>,
    pub filename: String,
    pub submitter: String,
}

impl Submission {
    pub fn validate(self) -> PartyDirResult<ValidatedSubmission> {
        if self.events.is_empty() {
            return Err(reject("Events must be a non-empty array"));
        }

        if self.events.len() > MAX_SUBMISSION_EVENTS {
            return Err(reject(format!(
                "At most {} events can be submitted at once, got {}",
                MAX_SUBMISSION_EVENTS,
                self.events.len()
            )));
        }

        for (i, event) in self.events.iter().enumerate() {
            validate_event(event).map_err(|reason| reject(format!("Event {}: {}", i + 1, reason)))?;
        }

        let filename = sanitize_filename(&self.filename)
            .ok_or_else(|| reject("Filename must be a non-empty string"))?;

        if filename == MANIFEST_FILE {
            return Err(reject(format!("'{}' is reserved", MANIFEST_FILE)));
        }

        let submitter = self
            .submitter
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());

        let events = self
            .events
            .into_iter()
            .map(|mut event| {
                event.source_file = None;
                event.last_modified = None;
                event.with_resolved_id()
            })
            .collect();

        Ok(ValidatedSubmission {
            events,
            filename,
            submitter,
        })
    }
}

fn reject(reason: impl Into<String>) -> PartyDirError {
    PartyDirError::Submission(reason.into())
}

fn validate_event(event: &Party) -> Result<(), String> {
    let missing = event.missing_fields();
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }

    let start_time = event.start_time.as_deref().unwrap_or_default().trim();
    if !is_valid_start_time(start_time) {
        return Err(format!("startTime '{}' must be HH:MM", start_time));
    }

    if event.day().is_none() {
        return Err(format!("date '{}' is not a valid date", event.date));
    }

    Ok(())
}

/// `HH:MM` on the 24-hour clock, both parts zero-padded.
fn is_valid_start_time(s: &str) -> bool {
    let bytes = s.as_bytes();

    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
        && NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}

/// Replace anything outside `[a-zA-Z0-9_-]` with `-` and ensure a `.json`
/// extension. None if nothing is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.trim();
    let stem = name.strip_suffix(".json").unwrap_or(name).trim();

    if stem.is_empty() {
        return None;
    }

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    Some(format!("{}.json", stem))
}

/// Where accepted submissions go.
pub trait SubmissionSink {
    /// Store the submission and return a human-readable receipt.
    fn submit(&self, submission: &ValidatedSubmission) -> PartyDirResult<String>;
}

/// Writes submissions as new files into a data directory.
pub struct DataDirSink {
    dir: PartyDir,
}

impl DataDirSink {
    pub fn new(dir: PartyDir) -> Self {
        DataDirSink { dir }
    }

    /// Create a new file for `filename` without overwriting an existing one.
    /// If the name is taken, tries name-2.json, name-3.json, etc.
    ///
    /// The file is claimed with `create_new`, so a concurrent writer can't
    /// take the same name between the check and the write.
    fn create_unique(&self, filename: &str) -> PartyDirResult<(PathBuf, File)> {
        let data_path = self.dir.path();
        let stem = filename.trim_end_matches(".json");

        // Try base filename first, then suffixes
        let candidates = std::iter::once(filename.to_string())
            .chain((2..=100).map(|n| format!("{}-{}.json", stem, n)));

        for candidate in candidates {
            let path = data_path.join(candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(PartyDirError::Submission(format!(
            "Too many filename collisions for '{}'",
            filename
        )))
    }
}

impl SubmissionSink for DataDirSink {
    fn submit(&self, submission: &ValidatedSubmission) -> PartyDirResult<String> {
        std::fs::create_dir_all(self.dir.path())?;

        let content = serde_json::to_string_pretty(&submission.events)
            .map_err(|e| PartyDirError::Serialization(e.to_string()))?;
        let (path, mut file) = self.create_unique(&submission.filename)?;
        file.write_all((content + "\n").as_bytes())?;

        Ok(format!(
            "Wrote {} event(s) to {} (submitted by {})",
            submission.events.len(),
            path.display(),
            submission.submitter
        ))
    }
}
