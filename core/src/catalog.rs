//! Race catalog — the ordered set of races scraped in a run.
//!
//! The catalog is injected into the engine rather than read from a global,
//! so tests can run against synthetic races. Order is significant: it fixes
//! the order of the output map and the pending list.

use crate::{
    error::{ScrapeError, ScrapeResult},
    types::{RaceId, RaceKey},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub key:            RaceKey,
    pub display_name:   String,
    pub fetch_location: String,
    pub race_id:        RaceId,
}

impl Race {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        fetch_location: impl Into<String>,
        race_id: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            fetch_location: fetch_location.into(),
            race_id: race_id.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RaceCatalogFile {
    races: Vec<Race>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceCatalog {
    races: Vec<Race>,
}

impl RaceCatalog {
    /// Build a catalog, rejecting an empty list or duplicate keys.
    pub fn new(races: Vec<Race>) -> ScrapeResult<Self> {
        if races.is_empty() {
            return Err(ScrapeError::InvalidCatalog {
                reason: "catalog has no races".into(),
            });
        }
        let mut seen = HashSet::new();
        for race in &races {
            if !seen.insert(race.key.as_str()) {
                return Err(ScrapeError::InvalidCatalog {
                    reason: format!("duplicate race key '{}'", race.key),
                });
            }
        }
        Ok(Self { races })
    }

    /// Load a catalog from a JSON file of the form `{ "races": [...] }`.
    pub fn load(path: &Path) -> ScrapeResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        let file: RaceCatalogFile = serde_json::from_str(&content)?;
        Self::new(file.races)
    }

    pub fn races(&self) -> &[Race] {
        &self.races
    }

    /// Never zero: `new` rejects an empty list.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn get(&self, key: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.key == key)
    }

    /// The Georgia 2026 election-cycle races tracked by default.
    pub fn georgia_2026() -> Self {
        const BASE: &str = "https://www.transparencyusa.org/ga/race";
        const CYCLE: &str = "?cycle=2026-election-cycle";
        let race = |key: &str, label: &str, slug: &str, race_id: &str| {
            Race::new(key, label, format!("{BASE}/{slug}{CYCLE}"), race_id)
        };

        Self {
            races: vec![
                race("governor", "Governor", "governor-of-georgia-76665", "ga_governor"),
                race(
                    "lt_governor",
                    "Lieutenant Governor",
                    "lieutenant-governor-of-georgia-76666",
                    "ga_lt_governor",
                ),
                race(
                    "attorney_general",
                    "Attorney General",
                    "attorney-general-of-georgia-76669",
                    "ga_attorney_general",
                ),
                race(
                    "secretary_of_state",
                    "Secretary of State",
                    "georgia-secretary-of-state-76671",
                    "ga_secretary_of_state",
                ),
                race(
                    "senate_18",
                    "State Senate District 18",
                    "georgia-state-senate-district-18-71888",
                    "ga_senate_18",
                ),
                race(
                    "senate_20",
                    "State Senate District 20",
                    "georgia-state-senate-district-20-71891",
                    "ga_senate_20",
                ),
                race(
                    "senate_26",
                    "State Senate District 26",
                    "georgia-state-senate-district-26-71897",
                    "ga_senate_26",
                ),
                race(
                    "house_134",
                    "State House District 134",
                    "georgia-house-of-representatives-district-134-71974",
                    "ga_house_134",
                ),
                race(
                    "house_143",
                    "State House District 143",
                    "georgia-house-of-representatives-district-143-71984",
                    "ga_house_143",
                ),
                race(
                    "house_146",
                    "State House District 146",
                    "georgia-house-of-representatives-district-146-71987",
                    "ga_house_146",
                ),
            ],
        }
    }
}

impl Default for RaceCatalog {
    fn default() -> Self {
        Self::georgia_2026()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_ten_races_in_order() {
        let catalog = RaceCatalog::default();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.races()[0].race_id, "ga_governor");
        assert_eq!(catalog.races()[9].race_id, "ga_house_146");
    }

    #[test]
    fn default_catalog_urls_carry_cycle() {
        for race in RaceCatalog::default().races() {
            assert!(race.fetch_location.starts_with("https://www.transparencyusa.org/ga/race/"));
            assert!(race.fetch_location.ends_with("?cycle=2026-election-cycle"));
        }
    }

    #[test]
    fn lookup_by_key() {
        let catalog = RaceCatalog::default();
        let race = catalog.get("senate_20").expect("senate_20 present");
        assert_eq!(race.display_name, "State Senate District 20");
        assert!(catalog.get("mayor").is_none());
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(
            RaceCatalog::new(vec![]),
            Err(ScrapeError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let a = Race::new("a", "A", "http://a", "race_a");
        let err = RaceCatalog::new(vec![a.clone(), a]).unwrap_err();
        assert!(err.to_string().contains("duplicate race key 'a'"));
    }
}
