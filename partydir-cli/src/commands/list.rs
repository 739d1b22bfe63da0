use anyhow::Result;
use owo_colors::OwoColorize;
use partydir_core::date_range::DateRange;
use partydir_core::{FileOrdering, PartyDir};

use crate::render::render_by_day;

pub fn run(dir: &PartyDir, ordering: &dyn FileOrdering, range: DateRange, json: bool) -> Result<()> {
    let parties = dir.parties_in_range(ordering, &range)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parties)?);
        return Ok(());
    }

    if parties.is_empty() {
        println!("{}", "No parties found".dimmed());
        return Ok(());
    }

    println!("{}", render_by_day(&parties));
    Ok(())
}
