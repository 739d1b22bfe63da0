//! Core of partydir: turning a directory of independently edited party
//! files into one deduplicated, date-sorted listing.
//!
//! The two entry points are [`aggregate`] for the full listing and
//! [`featured`] for the parties of the currently featured week.

pub mod backfill;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod featured;
pub mod lint;
pub mod merge;
pub mod ordering;
pub mod party;
pub mod partydir;
pub mod stable_id;
pub mod submission;

use std::path::Path;

use chrono::{DateTime, Utc};

pub use error::{PartyDirError, PartyDirResult};
pub use featured::{FeaturedWeek, FeaturedWindow};
pub use ordering::{FileOrdering, GitHistory, ModifiedTime};
pub use party::Party;
pub use partydir::PartyDir;

/// All parties in `data_dir`, one per id, sorted by date.
pub fn aggregate(data_dir: &Path, ordering: &dyn FileOrdering) -> PartyDirResult<Vec<Party>> {
    PartyDir::new(data_dir).aggregate(ordering)
}

/// Parties in `data_dir` that fall within the featured window at `now`.
pub fn featured(
    data_dir: &Path,
    ordering: &dyn FileOrdering,
    now: DateTime<Utc>,
) -> PartyDirResult<Vec<Party>> {
    let (_, parties) = PartyDir::new(data_dir).featured(ordering, now)?;
    Ok(parties)
}
