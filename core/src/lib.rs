//! Campaign-finance race scraper core.
//!
//! Fetches each configured race page, extracts the candidate finance table,
//! derives stable candidate ids, and reconciles them against the known
//! roster to surface newly filed candidates.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod extractor;
pub mod fetch;
pub mod name_normalizer;
pub mod reconciliation;
pub mod report;
pub mod roster;
pub mod types;

pub use catalog::{Race, RaceCatalog};
pub use engine::{RunReport, ScrapeEngine};
pub use error::{ScrapeError, ScrapeResult};
pub use name_normalizer::{clean, derive_id};
