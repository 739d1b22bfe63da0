//! Consistency checks over a whole data directory.
//!
//! Aggregation tolerates sloppy data; this is the stricter view used before
//! committing changes: every record complete, every explicit id matching its
//! derived id, and no party listed twice.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::PartyDirResult;
use crate::party::Party;
use crate::partydir::PartyDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The file couldn't be read, e.g. because it isn't UTF-8.
    Unreadable(String),
    InvalidJson(String),
    NotAnArray,
    MalformedEvent(String),
    MissingField(&'static str),
    IdMismatch { found: String, expected: String },
    Duplicate { file: String, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub file: String,
    /// Position of the event within the file, if the issue is about one event.
    pub index: Option<usize>,
    pub kind: IssueKind,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]: ", self.file, i)?,
            None => write!(f, "{}: ", self.file)?,
        }

        match &self.kind {
            IssueKind::Unreadable(e) => write!(f, "unreadable ({})", e),
            IssueKind::InvalidJson(e) => write!(f, "invalid JSON ({})", e),
            IssueKind::NotAnArray => write!(f, "not an array"),
            IssueKind::MalformedEvent(e) => write!(f, "malformed event ({})", e),
            IssueKind::MissingField(field) => write!(f, "missing {}", field),
            IssueKind::IdMismatch { found, expected } => {
                write!(f, "ID mismatch: \"{}\" should be \"{}\"", found, expected)
            }
            IssueKind::Duplicate { file, index } => write!(f, "duplicate of {}[{}]", file, index),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub files_checked: usize,
    pub events_checked: usize,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, file: &str, index: Option<usize>, kind: IssueKind) {
        self.issues.push(LintIssue {
            file: file.to_string(),
            index,
            kind,
        });
    }
}

/// Check every data file, in file name order.
pub fn lint(dir: &PartyDir) -> PartyDirResult<LintReport> {
    let mut report = LintReport::default();
    let mut seen: HashMap<(String, String, String), (String, usize)> = HashMap::new();

    for name in dir.file_names()? {
        report.files_checked += 1;

        let content = match std::fs::read_to_string(dir.path().join(&name)) {
            Ok(content) => content,
            Err(e) => {
                report.push(&name, None, IssueKind::Unreadable(e.to_string()));
                continue;
            }
        };
        let items = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                report.push(&name, None, IssueKind::NotAnArray);
                continue;
            }
            Err(e) => {
                report.push(&name, None, IssueKind::InvalidJson(e.to_string()));
                continue;
            }
        };

        for (i, item) in items.into_iter().enumerate() {
            report.events_checked += 1;

            let party: Party = match serde_json::from_value(item) {
                Ok(party) => party,
                Err(e) => {
                    report.push(&name, Some(i), IssueKind::MalformedEvent(e.to_string()));
                    continue;
                }
            };

            for field in party.missing_fields() {
                report.push(&name, Some(i), IssueKind::MissingField(field));
            }

            if let Some(found) = party.explicit_id() {
                let expected = party.stable_id();
                if found != expected && !party.title.is_empty() && !party.date.is_empty() {
                    report.push(
                        &name,
                        Some(i),
                        IssueKind::IdMismatch {
                            found: found.to_string(),
                            expected,
                        },
                    );
                }
            }

            let key = (party.title, party.date, party.venue);
            match seen.get(&key) {
                Some((file, index)) => {
                    let kind = IssueKind::Duplicate {
                        file: file.clone(),
                        index: *index,
                    };
                    report.push(&name, Some(i), kind);
                }
                None => {
                    seen.insert(key, (name.clone(), i));
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lint_files(files: &[(&str, Value)]) -> LintReport {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content.to_string()).unwrap();
        }
        lint(&PartyDir::new(dir.path())).unwrap()
    }

    #[test]
    fn test_clean_directory() {
        let report = lint_files(&[(
            "a.json",
            json!([{"id": "579ac733", "title": "Foo", "venue": "Bar", "date": "2025-06-01", "startTime": "23:00"}]),
        )]);

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.events_checked, 1);
    }

    #[test]
    fn test_reports_missing_fields_and_id_mismatch() {
        let report = lint_files(&[(
            "a.json",
            json!([{"id": "deadbeef", "title": "Foo", "venue": "Bar", "date": "2025-06-01"}]),
        )]);

        let messages: Vec<_> = report.issues.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "a.json[0]: missing startTime",
                "a.json[0]: ID mismatch: \"deadbeef\" should be \"579ac733\"",
            ]
        );
    }

    #[test]
    fn test_reports_duplicates_across_files() {
        let party = json!({"title": "Foo", "venue": "Bar", "date": "2025-06-01", "startTime": "23:00"});
        let report = lint_files(&[("a.json", json!([party])), ("b.json", json!([party]))]);

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].to_string(), "b.json[0]: duplicate of a.json[0]");
    }

    #[test]
    fn test_reports_unparseable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{\"oops\"").unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("manifest.json"), "{}").unwrap();

        let report = lint(&PartyDir::new(dir.path())).unwrap();

        assert_eq!(report.files_checked, 2);
        assert!(matches!(report.issues[0].kind, IssueKind::InvalidJson(_)));
        assert_eq!(report.issues[1].kind, IssueKind::NotAnArray);
    }

    #[test]
    fn test_reports_non_utf8_files_and_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), b"[\xff\xfe]").unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            json!([{"title": "Foo", "venue": "Bar", "date": "2025-06-01"}]).to_string(),
        )
        .unwrap();

        let report = lint(&PartyDir::new(dir.path())).unwrap();

        assert_eq!(report.files_checked, 2);
        assert_eq!(report.events_checked, 1);
        assert!(matches!(report.issues[0].kind, IssueKind::Unreadable(_)));
        assert_eq!(report.issues[0].file, "a.json");
        assert_eq!(report.issues[1].to_string(), "b.json[0]: missing startTime");
    }
}
