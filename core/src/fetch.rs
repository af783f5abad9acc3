//! Page sources — where the rendered HTML for a race comes from.
//!
//! RULE: a page source only returns page content. Parsing lives in the
//! extractor, bookkeeping in the engine. Any error returned here is fatal
//! to the run; there are no retries.
//!
//! JavaScript is never executed. Sites that render their tables client-side
//! need `SnapshotPageSource` fed by an external headless browser.

use crate::{
    catalog::Race,
    error::{ScrapeError, ScrapeResult},
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str =
    concat!("race-finance-runner/", env!("CARGO_PKG_VERSION"));

/// The contract every page source must fulfill.
pub trait PageSource {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Return the page content for `race`.
    fn fetch(&mut self, race: &Race) -> ScrapeResult<String>;
}

/// Plain HTTP GET of the race's fetch location.
pub struct HttpPageSource {
    client: reqwest::blocking::Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, user_agent: &str) -> ScrapeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| ScrapeError::Http {
                url: String::from("<client>"),
                source,
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&mut self, race: &Race) -> ScrapeResult<String> {
        let url = race.fetch_location.as_str();
        let http_err = |source| ScrapeError::Http { url: url.to_string(), source };

        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;
        resp.text().map_err(http_err)
    }
}

/// Reads `<dir>/<race key>.html`, a DOM saved by an external renderer.
pub struct SnapshotPageSource {
    dir: PathBuf,
}

impl SnapshotPageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, race: &Race) -> PathBuf {
        self.dir.join(format!("{}.html", race.key))
    }
}

impl PageSource for SnapshotPageSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn fetch(&mut self, race: &Race) -> ScrapeResult<String> {
        let path = self.path_for(race);
        if !path.is_file() {
            return Err(ScrapeError::MissingSnapshot { race_key: race.key.clone(), path });
        }
        std::fs::read_to_string(&path).map_err(|e| ScrapeError::io(path, e))
    }
}

/// In-memory pages keyed by race key.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages:   HashMap<String, String>,
    fetched: Vec<String>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, race_key: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(race_key.into(), html.into());
        self
    }

    /// Race keys in the order they were fetched.
    pub fn fetched(&self) -> &[String] {
        &self.fetched
    }
}

impl PageSource for StaticPageSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&mut self, race: &Race) -> ScrapeResult<String> {
        self.fetched.push(race.key.clone());
        self.pages
            .get(&race.key)
            .cloned()
            .ok_or_else(|| ScrapeError::MissingPage { race_key: race.key.clone() })
    }
}
