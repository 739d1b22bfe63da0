//! Write derived ids into data files that lack them.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{PartyDirError, PartyDirResult};
use crate::partydir::PartyDir;
use crate::stable_id::stable_id;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Files rewritten, with the number of ids added to each.
    pub updated: Vec<(String, usize)>,
    /// Files that already had an id on every event.
    pub unchanged: Vec<String>,
    /// Files left alone because they couldn't be read or parsed as an array.
    pub skipped: Vec<String>,
}

/// Add an id to every event that doesn't have one.
///
/// Only the `id` key is touched; all other keys keep their values and order.
pub fn backfill_ids(dir: &PartyDir) -> PartyDirResult<BackfillReport> {
    let mut report = BackfillReport::default();

    for name in dir.file_names()? {
        let path = dir.path().join(&name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping unreadable file");
                report.skipped.push(name);
                continue;
            }
        };

        let mut items = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(items)) => items,
            Ok(_) | Err(_) => {
                warn!(file = %name, "Skipping file that is not a JSON array");
                report.skipped.push(name);
                continue;
            }
        };

        let added = items.iter_mut().filter_map(Value::as_object_mut).fold(0, |added, event| {
            let has_id = event
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.trim().is_empty());
            if has_id {
                return added;
            }

            let id = stable_id(
                str_field(event, "title"),
                str_field(event, "date"),
                str_field(event, "venue"),
            );
            event.insert("id".to_string(), Value::String(id));
            added + 1
        });

        if added == 0 {
            report.unchanged.push(name);
            continue;
        }

        let content = serde_json::to_string_pretty(&Value::Array(items))
            .map_err(|e| PartyDirError::Serialization(e.to_string()))?;
        std::fs::write(&path, content + "\n")?;

        info!(file = %name, added, "Added ids");
        report.updated.push((name, added));
    }

    Ok(report)
}

fn str_field<'a>(event: &'a Map<String, Value>, key: &str) -> &'a str {
    event.get(key).and_then(Value::as_str).unwrap_or_default()
}
