//! Known-candidate roster loader.
//!
//! POLICY: a missing roster is NOT an error. The run proceeds with an
//! empty known set, which turns every scraped candidate into a pending one.
//! A roster that exists but cannot be read or parsed still aborts the run.

use crate::{
    error::{ScrapeError, ScrapeResult},
    types::CandidateId,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Roster location relative to the data repository.
pub fn roster_path(data_repo: &Path) -> PathBuf {
    data_repo.join("candidates").join("index.json")
}

/// Only `id` is required; every other roster field is ignored.
#[derive(Debug, Deserialize)]
struct RosterRecord {
    id: CandidateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownCandidateSet {
    ids: HashSet<CandidateId>,
}

impl KnownCandidateSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.ids.contains(candidate_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<CandidateId>> FromIterator<S> for KnownCandidateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { ids: iter.into_iter().map(Into::into).collect() }
    }
}

/// Load the known ids from a roster file (a JSON array of `{ "id": ... }`).
pub fn load_known_ids(path: &Path) -> ScrapeResult<KnownCandidateSet> {
    if !path.exists() {
        log::warn!(
            "Roster not found at {}; treating every candidate as new",
            path.display()
        );
        return Ok(KnownCandidateSet::empty());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    let records: Vec<RosterRecord> = serde_json::from_str(&content)?;
    let known: KnownCandidateSet = records.into_iter().map(|r| r.id).collect();

    log::info!("Loaded {} existing candidates from {}", known.len(), path.display());
    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_roster_fails_open() {
        let dir = TempDir::new().unwrap();
        let known = load_known_ids(&roster_path(dir.path())).unwrap();
        assert!(known.is_empty());
    }

    #[test]
    fn loads_ids_and_ignores_other_fields() {
        let dir = TempDir::new().unwrap();
        let path = roster_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"[
                {"id": "jane_doe", "name": "Jane Doe", "party": "D"},
                {"id": "john_smith"},
                {"id": "jane_doe"}
            ]"#,
        )
        .unwrap();

        let known = load_known_ids(&path).unwrap();
        assert_eq!(known.len(), 2);
        assert!(known.contains("jane_doe"));
        assert!(known.contains("john_smith"));
        assert!(!known.contains("someone_else"));
    }

    #[test]
    fn malformed_roster_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"not": "a list"}"#).unwrap();
        assert!(matches!(
            load_known_ids(&path),
            Err(ScrapeError::Serialization(_))
        ));
    }
}
