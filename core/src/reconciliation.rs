//! Reconciliation — normalizes scraped rows and diffs them against the
//! known roster.
//!
//! Design:
//!   - Every row yields one FinancialSummaryEntry keyed by candidate id.
//!   - A row whose id is not in the known set also yields a PendingCandidate.
//!   - Across a run, entries are kept in first-insertion order. A colliding
//!     id overwrites the earlier entry in place (same position, new value).
//!   - Pending candidates keep encounter order and are never deduplicated.

use crate::{
    catalog::Race,
    extractor::RawCandidateRow,
    name_normalizer::NameNormalizer,
    roster::KnownCandidateSet,
    types::{CandidateId, RaceId, Timestamp},
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct FinancialSummaryEntry {
    pub name:          String,
    pub race:          RaceId,
    pub party:         String,
    pub contributions: String,
    pub loans:         String,
    pub expenditures:  String,
    pub status:        String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCandidate {
    pub suggested_id:  CandidateId,
    pub name:          String,
    pub party:         String,
    pub race:          RaceId,
    pub contributions: String,
    pub detected_on:   Timestamp,
}

/// Result of reconciling a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub candidate_id: CandidateId,
    pub entry:        FinancialSummaryEntry,
    pub pending:      Option<PendingCandidate>,
}

/// Reconcile one scraped row. Total: never fails.
pub fn reconcile(
    normalizer: &NameNormalizer,
    row: &RawCandidateRow,
    race: &Race,
    known: &KnownCandidateSet,
    timestamp: &str,
) -> Reconciliation {
    let identity = normalizer.identify(&row.name);

    let entry = FinancialSummaryEntry {
        name: identity.cleaned_name.clone(),
        race: race.race_id.clone(),
        party: row.party.clone(),
        contributions: row.contributions.clone(),
        loans: row.loans.clone(),
        expenditures: row.expenditures.clone(),
        status: row.status.clone(),
    };

    let pending = (!known.contains(&identity.candidate_id)).then(|| PendingCandidate {
        suggested_id: identity.candidate_id.clone(),
        name: identity.cleaned_name,
        party: row.party.clone(),
        race: race.race_id.clone(),
        contributions: row.contributions.clone(),
        detected_on: timestamp.to_string(),
    });

    Reconciliation { candidate_id: identity.candidate_id, entry, pending }
}

/// Candidate id → entry, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialSummaryMap {
    order:   Vec<CandidateId>,
    entries: HashMap<CandidateId, FinancialSummaryEntry>,
}

impl FinancialSummaryMap {
    /// Insert or overwrite. Returns the replaced entry, if any.
    pub fn insert(
        &mut self,
        candidate_id: CandidateId,
        entry: FinancialSummaryEntry,
    ) -> Option<FinancialSummaryEntry> {
        if !self.entries.contains_key(&candidate_id) {
            self.order.push(candidate_id.clone());
        }
        self.entries.insert(candidate_id, entry)
    }

    pub fn get(&self, candidate_id: &str) -> Option<&FinancialSummaryEntry> {
        self.entries.get(candidate_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CandidateId, &FinancialSummaryEntry)> {
        self.order.iter().filter_map(|id| self.entries.get(id).map(|e| (id, e)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.order.iter()
    }
}

impl Serialize for FinancialSummaryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, entry) in self.iter() {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}

/// Run-wide accumulation of reconciled rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunAggregate {
    pub financials: FinancialSummaryMap,
    pub pending:    Vec<PendingCandidate>,
}

impl RunAggregate {
    /// Fold one reconciled row in. Returns the race id of the entry that was
    /// overwritten when the candidate id was already present.
    pub fn absorb(&mut self, reconciliation: Reconciliation) -> Option<RaceId> {
        let Reconciliation { candidate_id, entry, pending } = reconciliation;
        if let Some(p) = pending {
            self.pending.push(p);
        }
        self.financials.insert(candidate_id, entry).map(|previous| previous.race)
    }
}
