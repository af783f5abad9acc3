//! Shared primitive types used across the entire scraper.

/// Normalized candidate identifier, e.g. `jane_d_obrien_smith`.
pub type CandidateId = String;

/// Canonical race identifier, e.g. `ga_governor`.
pub type RaceId = String;

/// Internal catalog key for a race, e.g. `governor`.
pub type RaceKey = String;

/// Run timestamp as written to the output files (ISO-8601 / RFC 3339).
pub type Timestamp = String;
