use anyhow::Result;
use owo_colors::OwoColorize;
use partydir_core::PartyDir;
use partydir_core::backfill::backfill_ids;

pub fn run(dir: &PartyDir) -> Result<()> {
    let report = backfill_ids(dir)?;

    for (file, added) in &report.updated {
        println!("{} {} ({} ids added)", "Updated".green(), file, added);
    }
    for file in &report.unchanged {
        println!("{}", format!("Skipped {} (no changes)", file).dimmed());
    }
    for file in &report.skipped {
        println!("{}", format!("Skipped {} (not an array)", file).yellow());
    }

    Ok(())
}
