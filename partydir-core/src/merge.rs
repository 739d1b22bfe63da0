//! Conflict resolution between records sharing an id.

use std::collections::HashMap;

use tracing::debug;

use crate::party::Party;

/// How much a record's data can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Scraped from the third-party aggregator.
    Scraped,
    /// Curated by hand or taken from a first-party source.
    Curated,
}

impl Fidelity {
    pub fn of(party: &Party) -> Self {
        if party.is_scraped() {
            Fidelity::Scraped
        } else {
            Fidelity::Curated
        }
    }
}

/// What happened when a record was merged into a [`PartyMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First record with this id.
    Inserted,
    /// A curated record replaced a scraped one.
    ReplacedScraped,
    /// A scraped record was discarded in favour of the curated one.
    KeptCurated,
    /// Same fidelity; the later record replaced the earlier one.
    Updated,
}

/// Id-keyed collection of parties that keeps first-insertion order.
///
/// Records must already carry their resolved id.
#[derive(Debug, Default)]
pub struct PartyMap {
    parties: Vec<Party>,
    index: HashMap<String, usize>,
}

impl PartyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Party> {
        self.index.get(id).map(|&i| &self.parties[i])
    }

    /// Merge `incoming` into the map.
    ///
    /// Curated data always beats scraped data. Between records of the same
    /// fidelity, the one merged last wins. A replaced record keeps its
    /// original position for ordering purposes.
    pub fn merge(&mut self, incoming: Party) -> MergeOutcome {
        let Some(&slot) = self.index.get(&incoming.id) else {
            self.index.insert(incoming.id.clone(), self.parties.len());
            self.parties.push(incoming);
            return MergeOutcome::Inserted;
        };

        let existing = &self.parties[slot];
        let outcome = match (Fidelity::of(existing), Fidelity::of(&incoming)) {
            (Fidelity::Scraped, Fidelity::Curated) => MergeOutcome::ReplacedScraped,
            (Fidelity::Curated, Fidelity::Scraped) => MergeOutcome::KeptCurated,
            _ => MergeOutcome::Updated,
        };

        let from = existing.source_file.as_deref().unwrap_or("?");
        let to = incoming.source_file.as_deref().unwrap_or("?");
        match outcome {
            MergeOutcome::ReplacedScraped => {
                debug!(id = %incoming.id, from, to, "Replacing scraped party with curated version")
            }
            MergeOutcome::KeptCurated => {
                debug!(id = %incoming.id, kept = from, ignored = to, "Keeping curated party over scraped version")
            }
            _ => debug!(id = %incoming.id, from, to, "Updating party with newer version"),
        }

        if outcome != MergeOutcome::KeptCurated {
            self.parties[slot] = incoming;
        }

        outcome
    }

    /// All parties, sorted by `date`.
    ///
    /// The sort is stable, so parties on the same date stay in
    /// first-insertion order.
    pub fn into_sorted(self) -> Vec<Party> {
        let mut parties = self.parties;
        parties.sort_by(|a, b| a.date.cmp(&b.date));
        parties
    }
}
