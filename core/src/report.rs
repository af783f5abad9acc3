//! Report writer — persists a RunReport into the data repository.
//!
//! RULE: only this module writes output files. Both files are replaced
//! wholesale on every run; nothing is merged with a previous run.

use crate::{
    engine::RunReport,
    error::{ScrapeError, ScrapeResult},
    reconciliation::{FinancialSummaryMap, PendingCandidate},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFinancialsFile<'a> {
    pub last_updated: &'a str,
    pub candidates:   &'a FinancialSummaryMap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCandidatesFile<'a> {
    pub last_checked:       &'a str,
    pub pending_candidates: &'a [PendingCandidate],
}

impl RunReport {
    pub fn financials_file(&self) -> StateFinancialsFile<'_> {
        StateFinancialsFile { last_updated: &self.timestamp, candidates: &self.financials }
    }

    pub fn pending_file(&self) -> PendingCandidatesFile<'_> {
        PendingCandidatesFile { last_checked: &self.timestamp, pending_candidates: &self.pending }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPaths {
    pub financials: PathBuf,
    pub pending:    PathBuf,
}

pub struct ReportWriter {
    data_repo: PathBuf,
}

impl ReportWriter {
    pub fn new(data_repo: impl Into<PathBuf>) -> Self {
        Self { data_repo: data_repo.into() }
    }

    pub fn financials_path(&self) -> PathBuf {
        self.data_repo.join("financials").join("state-financials.json")
    }

    pub fn pending_path(&self) -> PathBuf {
        self.data_repo.join("candidates").join("pending-candidates.json")
    }

    /// Serialize both files, stage them next to their targets, then
    /// rename them into place. A failure while staging leaves both
    /// previous outputs untouched.
    pub fn write(&self, report: &RunReport) -> ScrapeResult<WrittenPaths> {
        let financials = self.financials_path();
        let pending = self.pending_path();
        let financials_json = serde_json::to_string_pretty(&report.financials_file())?;
        let pending_json = serde_json::to_string_pretty(&report.pending_file())?;

        let mut staged = Vec::with_capacity(2);
        for (path, json) in [(&financials, financials_json), (&pending, pending_json)] {
            match stage(path, &json) {
                Ok(tmp) => staged.push((tmp, path)),
                Err(e) => {
                    for (tmp, _) in &staged {
                        let _ = std::fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }
        for (tmp, path) in &staged {
            std::fs::rename(tmp, path).map_err(|e| ScrapeError::io(*path, e))?;
        }

        log::info!(
            "Saved financial data for {} candidates to {}",
            report.financials.len(),
            financials.display()
        );
        log::info!(
            "Saved {} pending candidates to {}",
            report.pending.len(),
            pending.display()
        );
        Ok(WrittenPaths { financials, pending })
    }
}

/// Write `json` to `<path>.tmp`, creating the parent directory first.
fn stage(path: &Path, json: &str) -> ScrapeResult<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScrapeError::io(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    if let Err(e) = std::fs::write(&tmp, json) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ScrapeError::io(&tmp, e));
    }
    Ok(tmp)
}
