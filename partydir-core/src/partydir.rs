//! Data directory access and aggregation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::MANIFEST_FILE;
use crate::date_range::DateRange;
use crate::error::{PartyDirError, PartyDirResult};
use crate::featured::FeaturedWindow;
use crate::merge::PartyMap;
use crate::ordering::FileOrdering;
use crate::party::Party;

/// A directory of JSON files, each holding an array of parties.
#[derive(Debug, Clone)]
pub struct PartyDir {
    path: PathBuf,
    manifest: String,
}

/// A data file together with its effective timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub last_modified: DateTime<Utc>,
}

impl PartyDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PartyDir {
            path: path.into(),
            manifest: MANIFEST_FILE.to_string(),
        }
    }

    /// Use a different name for the reserved configuration file.
    pub fn with_manifest(mut self, manifest: &str) -> Self {
        self.manifest = manifest.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the data files, sorted by name.
    ///
    /// The manifest and dotfiles are excluded. A missing or unreadable
    /// directory is an error.
    pub fn file_names(&self) -> PartyDirResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PartyDirError::DataDirNotFound(self.path.clone()),
            _ => PartyDirError::Io(e),
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .filter(|name| name.ends_with(".json"))
            .filter(|name| *name != self.manifest && !name.starts_with('.'))
            .collect();

        names.sort();
        Ok(names)
    }

    /// Data files in processing order: oldest effective timestamp first.
    ///
    /// Files without a timestamp sort as the Unix epoch. Ties are broken by
    /// file name.
    pub fn source_files(&self, ordering: &dyn FileOrdering) -> PartyDirResult<Vec<SourceFile>> {
        let mut files: Vec<SourceFile> = self
            .file_names()?
            .into_iter()
            .map(|name| {
                let path = self.path.join(&name);
                let last_modified = ordering
                    .last_modified(&path)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                SourceFile {
                    name,
                    path,
                    last_modified,
                }
            })
            .collect();

        files.sort_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(files)
    }

    /// Every party in the directory, one per id, sorted by date.
    ///
    /// Files that aren't valid JSON arrays are skipped with a warning.
    pub fn aggregate(&self, ordering: &dyn FileOrdering) -> PartyDirResult<Vec<Party>> {
        let files = self.source_files(ordering)?;
        let mut parties = PartyMap::new();

        for file in &files {
            debug!(file = %file.name, last_modified = %file.last_modified.to_rfc3339(), "Processing");

            let Some(records) = read_records(file) else {
                continue;
            };

            for party in records {
                let party = party
                    .with_resolved_id()
                    .with_provenance(&file.name, file.last_modified);
                parties.merge(party);
            }
        }

        debug!(files = files.len(), parties = parties.len(), "Aggregated");
        Ok(parties.into_sorted())
    }

    /// Aggregated parties whose date falls within `range`.
    ///
    /// An unbounded range returns the full aggregated listing.
    pub fn parties_in_range(
        &self,
        ordering: &dyn FileOrdering,
        range: &DateRange,
    ) -> PartyDirResult<Vec<Party>> {
        Ok(self
            .aggregate(ordering)?
            .into_iter()
            .filter(|p| range.includes(p))
            .collect())
    }

    /// The featured window at `now` and the aggregated parties within it.
    pub fn featured(
        &self,
        ordering: &dyn FileOrdering,
        now: DateTime<Utc>,
    ) -> PartyDirResult<(FeaturedWindow, Vec<Party>)> {
        let window = FeaturedWindow::at(now);
        let parties = window.select(self.aggregate(ordering)?);
        Ok((window, parties))
    }
}

/// Parse one data file. None if the file has to be skipped as a whole.
fn read_records(file: &SourceFile) -> Option<Vec<Party>> {
    let content = match std::fs::read_to_string(&file.path) {
        Ok(content) => content,
        Err(e) => {
            warn!(file = %file.name, error = %e, "Skipping unreadable file");
            return None;
        }
    };

    let items = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(file = %file.name, "Skipping file that does not contain an array of events");
            return None;
        }
        Err(e) => {
            warn!(file = %file.name, error = %e, "Skipping file with invalid JSON");
            return None;
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<Party>(item) {
            Ok(party) => Some(party),
            Err(e) => {
                warn!(file = %file.name, index = i, error = %e, "Skipping malformed event");
                None
            }
        })
        .collect();

    Some(records)
}
