use anyhow::Result;
use owo_colors::OwoColorize;
use partydir_core::PartyDir;
use partydir_core::lint::lint;

pub fn run(dir: &PartyDir) -> Result<()> {
    let report = lint(dir)?;

    if report.is_clean() {
        println!(
            "{}",
            format!(
                "All {} events across {} files are valid.",
                report.events_checked, report.files_checked
            )
            .green()
        );
        return Ok(());
    }

    for issue in &report.issues {
        eprintln!("  {} {}", "-".red(), issue);
    }

    anyhow::bail!("{} validation error(s)", report.issues.len());
}
