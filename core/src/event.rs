//! Run events — the ordered record of what happened during a scrape run.
//!
//! RULE: the engine records an event for every notable step. The runner
//! derives its progress output from the log; nothing else reads it.

use crate::{
    extractor::TableStatus,
    types::{CandidateId, RaceId, RaceKey, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    // ── Run lifecycle ──────────────────────────────
    RunStarted {
        timestamp: Timestamp,
        race_count: usize,
        known_candidates: usize,
    },
    RunCompleted {
        timestamp: Timestamp,
        candidates: usize,
        pending: usize,
    },

    // ── Per race ───────────────────────────────────
    RaceStarted {
        race_key: RaceKey,
        display_name: String,
    },
    TableMissing {
        race_key: RaceKey,
        status: TableStatus,
    },
    RowSkipped {
        race_key: RaceKey,
        skipped: usize,
    },
    /// `rows` were recorded out of `rows_seen` matched row elements.
    RaceCompleted {
        race_key: RaceKey,
        rows: usize,
        rows_seen: usize,
    },

    // ── Per candidate ──────────────────────────────
    CandidateRecorded {
        candidate_id: CandidateId,
        name: String,
        party: String,
        contributions: String,
    },
    NewCandidateDetected {
        candidate_id: CandidateId,
        name: String,
        race: RaceId,
    },
    /// A candidate id already recorded in this run was produced again;
    /// the later entry replaced the earlier one.
    CandidateIdCollision {
        candidate_id: CandidateId,
        previous_race: RaceId,
        race: RaceId,
    },
}

impl RunEvent {
    /// Stable snake_case name of the variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            RunEvent::RunStarted { .. }           => "run_started",
            RunEvent::RunCompleted { .. }         => "run_completed",
            RunEvent::RaceStarted { .. }          => "race_started",
            RunEvent::TableMissing { .. }         => "table_missing",
            RunEvent::RowSkipped { .. }           => "row_skipped",
            RunEvent::RaceCompleted { .. }        => "race_completed",
            RunEvent::CandidateRecorded { .. }    => "candidate_recorded",
            RunEvent::NewCandidateDetected { .. } => "new_candidate_detected",
            RunEvent::CandidateIdCollision { .. } => "candidate_id_collision",
        }
    }
}
