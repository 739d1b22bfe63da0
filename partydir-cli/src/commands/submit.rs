use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use partydir_core::submission::{DataDirSink, Submission, SubmissionSink};
use partydir_core::{Party, PartyDir};

pub fn run(dir: &PartyDir, file: &Path, filename: String, submitter: Option<String>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let events: Vec<Party> = serde_json::from_str(&content)
        .with_context(|| format!("{} must contain a JSON array of parties", file.display()))?;

    let submission = Submission {
        events,
        filename,
        submitter,
    };
    let validated = submission.validate()?;

    for event in &validated.events {
        println!("  {} {} {}", "+".green(), event, format!("[{}]", event.id).dimmed());
    }

    let receipt = DataDirSink::new(dir.clone()).submit(&validated)?;
    println!("{}", receipt.green());

    Ok(())
}
