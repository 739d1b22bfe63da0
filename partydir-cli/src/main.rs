mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use partydir_core::{PartyDir, PartyDirResult};
use partydir_core::config::PartyDirConfig;
use partydir_core::date_range::DateRange;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partydir")]
#[command(about = "List, check and submit the parties in a partydir data directory")]
struct Cli {
    /// Data directory (defaults to data_dir from the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log file processing order and merge decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all parties, deduplicated and sorted by date
    List {
        /// Show parties from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show parties until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Show the parties of the currently featured week
    Featured {
        /// Evaluate at this instant instead of now (RFC 3339, or YYYY-MM-DDTHH:MM in Berlin time)
        #[arg(long)]
        at: Option<String>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Print the id derived from a party's title, date and venue
    Id {
        #[arg(long)]
        title: String,

        #[arg(long)]
        date: String,

        #[arg(long)]
        venue: Option<String>,
    },
    /// Check every data file for missing fields, wrong ids and duplicates
    Lint,
    /// Write derived ids into events that don't have one
    Backfill,
    /// Validate a batch of new parties and add it to the data directory
    Submit {
        /// JSON file holding an array of parties
        file: PathBuf,

        /// Name of the data file to create
        #[arg(short, long)]
        filename: String,

        /// Who submitted the parties
        #[arg(short, long)]
        submitter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Deriving an id needs neither the config nor the data directory
    if let Commands::Id { title, date, venue } = &cli.command {
        commands::id::run(title, date, venue.as_deref().unwrap_or_default());
        return Ok(());
    }

    let (dir, config) = resolve_dir(cli.data_dir, PartyDirConfig::load())?;

    match cli.command {
        Commands::List { from, to, json } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref())?;
            commands::list::run(&dir, &*config.file_ordering(), range, json)
        }
        Commands::Featured { at, json } => {
            commands::featured::run(&dir, &*config.file_ordering(), at.as_deref(), json)
        }
        Commands::Id { .. } => Ok(()),
        Commands::Lint => commands::lint::run(&dir),
        Commands::Backfill => commands::backfill::run(&dir),
        Commands::Submit {
            file,
            filename,
            submitter,
        } => commands::submit::run(&dir, &file, filename, submitter),
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Pick the data directory and the config to run with.
///
/// Without `--data-dir` the config file is required. With it, a broken
/// config file only costs the non-default settings.
fn resolve_dir(
    data_dir: Option<PathBuf>,
    config: PartyDirResult<PartyDirConfig>,
) -> Result<(PartyDir, PartyDirConfig)> {
    match data_dir {
        None => {
            let config = config?;
            Ok((config.party_dir(), config))
        }
        Some(path) => {
            let config = config.unwrap_or_else(|e| {
                eprintln!("{}", format!("Ignoring config: {}", e).yellow());
                PartyDirConfig::default()
            });
            let dir = PartyDir::new(path).with_manifest(&config.manifest);
            Ok((dir, config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partydir_core::PartyDirError;
    use partydir_core::ordering::OrderingKind;

    fn broken_config() -> PartyDirResult<PartyDirConfig> {
        Err(PartyDirError::Config("invalid type: string \"alphabetical\"".into()))
    }

    #[test]
    fn test_explicit_data_dir_survives_broken_config() {
        let (dir, config) = resolve_dir(Some(PathBuf::from("/tmp/raves")), broken_config()).unwrap();

        assert_eq!(dir.path(), std::path::Path::new("/tmp/raves"));
        assert_eq!(config.ordering, OrderingKind::Git);
    }

    #[test]
    fn test_broken_config_is_fatal_without_data_dir() {
        assert!(resolve_dir(None, broken_config()).is_err());
    }

    #[test]
    fn test_explicit_data_dir_keeps_configured_manifest() {
        let config = PartyDirConfig {
            manifest: "site.json".to_string(),
            ..PartyDirConfig::default()
        };

        let (_, config) = resolve_dir(Some(PathBuf::from("/tmp/raves")), Ok(config)).unwrap();

        assert_eq!(config.manifest, "site.json");
    }

    #[test]
    fn test_id_command_parses_without_data_dir() {
        let cli = Cli::try_parse_from(["partydir", "id", "--title", "T", "--date", "2025-06-01"]).unwrap();

        assert!(matches!(cli.command, Commands::Id { .. }));
        assert!(cli.data_dir.is_none());
    }
}
