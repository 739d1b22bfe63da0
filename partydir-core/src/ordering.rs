//! Effective timestamps for data files.
//!
//! Files touched more recently are processed later during aggregation and
//! therefore win conflicts between records of equal fidelity. Where the
//! timestamp comes from is pluggable: git history when available, the
//! filesystem otherwise.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Source of a per-file "last touched" timestamp.
pub trait FileOrdering {
    /// None means the timestamp is unknown; the file is then ordered first.
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Filesystem modification time only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedTime;

impl FileOrdering for ModifiedTime {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        modified_time(path)
    }
}

/// Time of the last commit touching the file, falling back to the
/// filesystem modification time for untracked files or when git is missing.
#[derive(Debug, Clone)]
pub struct GitHistory {
    git: Option<PathBuf>,
}

impl GitHistory {
    pub fn new() -> Self {
        GitHistory {
            git: which::which("git").ok(),
        }
    }

    /// Author date of the last commit touching `path`.
    ///
    /// The subprocess has no timeout.
    fn commit_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        let git = self.git.as_ref()?;
        let dir = path.parent()?;
        let file_name = path.file_name()?;

        let output = match Command::new(git)
            .arg("-C")
            .arg(dir)
            .args(["log", "-1", "--format=%aI", "--"])
            .arg(file_name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not run git");
                return None;
            }
        };

        if !output.status.success() {
            debug!(path = %path.display(), status = %output.status, "git log failed");
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.trim();
        if line.is_empty() {
            return None;
        }

        DateTime::parse_from_rfc3339(line)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for GitHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOrdering for GitHistory {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.commit_time(path).or_else(|| modified_time(path))
    }
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from)
}

/// Which ordering provider to use, as named in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKind {
    #[default]
    Git,
    Modified,
}

impl OrderingKind {
    pub fn provider(self) -> Box<dyn FileOrdering> {
        match self {
            OrderingKind::Git => Box::new(GitHistory::new()),
            OrderingKind::Modified => Box::new(ModifiedTime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modified_time_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(ModifiedTime.last_modified(&path).is_some());
    }

    #[test]
    fn test_missing_file_has_no_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert_eq!(ModifiedTime.last_modified(&path), None);
        assert_eq!(GitHistory::new().last_modified(&path), None);
    }

    #[test]
    fn test_git_history_falls_back_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, "[]").unwrap();

        assert_eq!(
            GitHistory::new().last_modified(&path),
            ModifiedTime.last_modified(&path)
        );
    }

    #[test]
    fn test_git_history_without_git_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, "[]").unwrap();

        let history = GitHistory { git: None };
        assert_eq!(history.last_modified(&path), ModifiedTime.last_modified(&path));
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .env("GIT_AUTHOR_DATE", "2020-01-02T03:04:05+00:00")
            .env("GIT_COMMITTER_DATE", "2020-01-02T03:04:05+00:00")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_git_history_reads_last_commit_time() {
        if which::which("git").is_err() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let tracked = dir.path().join("a.json");
        let untracked = dir.path().join("b.json");
        std::fs::write(&tracked, "[]").unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["add", "a.json"]);
        git(dir.path(), &["commit", "-q", "-m", "add parties"]);
        std::fs::write(&untracked, "[]").unwrap();

        let history = GitHistory::new();
        let expected = DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(history.last_modified(&tracked), Some(expected));
        assert_eq!(
            history.last_modified(&untracked),
            ModifiedTime.last_modified(&untracked)
        );
    }

    #[test]
    fn test_ordering_kind_from_config_value() {
        let kind: OrderingKind = serde_json::from_str("\"modified\"").unwrap();
        assert_eq!(kind, OrderingKind::Modified);
        assert_eq!(OrderingKind::default(), OrderingKind::Git);
    }
}
