//! Global partydir configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::MANIFEST_FILE;
use crate::error::{PartyDirError, PartyDirResult};
use crate::ordering::{FileOrdering, OrderingKind};
use crate::partydir::PartyDir;

static DEFAULT_DATA_DIR: &str = "./data";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_manifest() -> String {
    MANIFEST_FILE.to_string()
}

/// Global configuration at ~/.config/partydir/config.toml
///
/// Every key can also be set through the environment, e.g.
/// `PARTYDIR_DATA_DIR=~/cologne-raves/data`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PartyDirConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub ordering: OrderingKind,

    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for PartyDirConfig {
    fn default() -> Self {
        PartyDirConfig {
            data_dir: default_data_dir(),
            ordering: OrderingKind::default(),
            manifest: default_manifest(),
        }
    }
}

impl PartyDirConfig {
    pub fn config_path() -> PartyDirResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PartyDirError::Config("Could not determine config directory".into()))?
            .join("partydir");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> PartyDirResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (if it exists), then apply `PARTYDIR_*` overrides.
    pub fn load_from(path: &Path) -> PartyDirResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("PARTYDIR"))
            .build()
            .map_err(|e| PartyDirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PartyDirError::Config(e.to_string()))
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn party_dir(&self) -> PartyDir {
        PartyDir::new(self.data_path()).with_manifest(&self.manifest)
    }

    pub fn file_ordering(&self) -> Box<dyn FileOrdering> {
        self.ordering.provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = PartyDirConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.ordering, OrderingKind::Git);
        assert_eq!(config.manifest, "manifest.json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/srv/raves/data\"\nordering = \"modified\"\n").unwrap();

        let config = PartyDirConfig::load_from(&path).unwrap();

        assert_eq!(config.data_path(), PathBuf::from("/srv/raves/data"));
        assert_eq!(config.ordering, OrderingKind::Modified);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = PartyDirConfig {
            data_dir: PathBuf::from("~/raves"),
            ..PartyDirConfig::default()
        };

        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_invalid_ordering_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ordering = \"alphabetical\"\n").unwrap();

        assert!(matches!(
            PartyDirConfig::load_from(&path),
            Err(PartyDirError::Config(_))
        ));
    }
}
