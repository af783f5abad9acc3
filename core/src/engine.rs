//! The scrape engine — drives one complete run.
//!
//! EXECUTION ORDER (fixed):
//!   1. For each race, in catalog order:
//!      a. fetch the page   (fatal on error)
//!      b. extract rows     (missing table → zero rows, short rows skipped)
//!      c. reconcile rows   (total, never fails)
//!      d. pace
//!   2. Return the RunReport.
//!
//! RULES:
//!   - Strictly sequential; the engine owns all run state.
//!   - The engine never writes files. A fetch error aborts the run and
//!     discards everything gathered so far.

use crate::{
    catalog::{Race, RaceCatalog},
    clock::RunClock,
    error::ScrapeResult,
    event::RunEvent,
    extractor::{RowExtractor, TableStatus},
    fetch::PageSource,
    name_normalizer::NameNormalizer,
    reconciliation::{reconcile, FinancialSummaryMap, PendingCandidate, RunAggregate},
    roster::KnownCandidateSet,
    types::Timestamp,
};

/// Everything a run produced. Both outputs share one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub timestamp:  Timestamp,
    pub financials: FinancialSummaryMap,
    pub pending:    Vec<PendingCandidate>,
    pub events:     Vec<RunEvent>,
}

impl RunReport {
    /// Number of rows recorded for a race, from the event log.
    pub fn rows_for_race(&self, race_key: &str) -> Option<usize> {
        self.events.iter().find_map(|e| match e {
            RunEvent::RaceCompleted { race_key: k, rows, .. } if k == race_key => Some(*rows),
            _ => None,
        })
    }

    pub fn collisions(&self) -> impl Iterator<Item = &RunEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, RunEvent::CandidateIdCollision { .. }))
    }
}

pub struct ScrapeEngine {
    catalog:    RaceCatalog,
    known:      KnownCandidateSet,
    clock:      RunClock,
    normalizer: NameNormalizer,
    extractor:  RowExtractor,
    aggregate:  RunAggregate,
    events:     Vec<RunEvent>,
}

impl ScrapeEngine {
    pub fn new(
        catalog: RaceCatalog,
        known: KnownCandidateSet,
        clock: RunClock,
    ) -> ScrapeResult<Self> {
        Ok(Self {
            catalog,
            known,
            clock,
            normalizer: NameNormalizer::default(),
            extractor: RowExtractor::new()?,
            aggregate: RunAggregate::default(),
            events: Vec::new(),
        })
    }

    pub fn with_normalizer(mut self, normalizer: NameNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_extractor(mut self, extractor: RowExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn catalog(&self) -> &RaceCatalog {
        &self.catalog
    }

    /// Scrape every race and return the report. Consumes the engine so a
    /// run cannot be resumed or repeated with stale aggregates.
    pub fn run(mut self, source: &mut dyn PageSource) -> ScrapeResult<RunReport> {
        let timestamp = self.clock.timestamp();
        log::info!(
            "Run started at {timestamp}: {} races via {} source, {} known candidates",
            self.catalog.len(),
            source.name(),
            self.known.len()
        );
        self.record(RunEvent::RunStarted {
            timestamp: timestamp.clone(),
            race_count: self.catalog.len(),
            known_candidates: self.known.len(),
        });

        let races = self.catalog.races().to_vec();
        for race in &races {
            self.scrape_race(race, source, &timestamp)?;
            self.clock.pace();
        }

        let RunAggregate { financials, pending } = std::mem::take(&mut self.aggregate);
        log::info!(
            "Run complete: {} candidates, {} pending",
            financials.len(),
            pending.len()
        );
        self.record(RunEvent::RunCompleted {
            timestamp: timestamp.clone(),
            candidates: financials.len(),
            pending: pending.len(),
        });

        Ok(RunReport { timestamp, financials, pending, events: self.events })
    }

    fn scrape_race(
        &mut self,
        race: &Race,
        source: &mut dyn PageSource,
        timestamp: &str,
    ) -> ScrapeResult<()> {
        log::info!("Scraping {}...", race.display_name);
        self.record(RunEvent::RaceStarted {
            race_key: race.key.clone(),
            display_name: race.display_name.clone(),
        });

        let html = source.fetch(race)?;
        let extraction = self.extractor.extract(&html);

        if extraction.status != TableStatus::Found {
            log::warn!("No data table for {} ({})", race.display_name, extraction.status);
            self.record(RunEvent::TableMissing {
                race_key: race.key.clone(),
                status: extraction.status,
            });
        }
        if extraction.skipped > 0 {
            log::warn!(
                "Skipped {} malformed row(s) for {}",
                extraction.skipped,
                race.display_name
            );
            self.record(RunEvent::RowSkipped {
                race_key: race.key.clone(),
                skipped: extraction.skipped,
            });
        }
        log::info!("Found {} candidates for {}", extraction.rows.len(), race.display_name);

        for row in &extraction.rows {
            let reconciled = reconcile(&self.normalizer, row, race, &self.known, timestamp);
            let candidate_id = reconciled.candidate_id.clone();

            log::debug!(
                "{} - {} - {}",
                reconciled.entry.name,
                reconciled.entry.party,
                reconciled.entry.contributions
            );
            self.record(RunEvent::CandidateRecorded {
                candidate_id: candidate_id.clone(),
                name: reconciled.entry.name.clone(),
                party: reconciled.entry.party.clone(),
                contributions: reconciled.entry.contributions.clone(),
            });
            if let Some(pending) = &reconciled.pending {
                log::info!("New candidate: {} ({})", pending.name, pending.suggested_id);
                self.record(RunEvent::NewCandidateDetected {
                    candidate_id: candidate_id.clone(),
                    name: pending.name.clone(),
                    race: pending.race.clone(),
                });
            }

            if let Some(previous_race) = self.aggregate.absorb(reconciled) {
                log::warn!(
                    "Candidate id '{candidate_id}' seen again in {}; replacing entry from {previous_race}",
                    race.race_id
                );
                self.record(RunEvent::CandidateIdCollision {
                    candidate_id,
                    previous_race,
                    race: race.race_id.clone(),
                });
            }
        }

        self.record(RunEvent::RaceCompleted {
            race_key:  race.key.clone(),
            rows:      extraction.rows.len(),
            rows_seen: extraction.rows_seen,
        });
        Ok(())
    }

    fn record(&mut self, event: RunEvent) {
        self.events.push(event);
    }
}
