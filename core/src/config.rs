//! Run configuration.
//!
//! Precedence: built-in defaults, then the `DATA_REPO_PATH` environment
//! variable, then command-line flags.

use crate::{
    catalog::RaceCatalog,
    clock::{RunClock, DEFAULT_RACE_DELAY},
    error::{ScrapeError, ScrapeResult},
    fetch::{HttpPageSource, PageSource, SnapshotPageSource, DEFAULT_FETCH_TIMEOUT, DEFAULT_USER_AGENT},
    roster,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATA_REPO: &str = "../election-data";
pub const DATA_REPO_ENV: &str = "DATA_REPO_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSourceKind {
    Http,
    /// Pre-rendered pages, one `<race key>.html` per race.
    Snapshots(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub data_repo:     PathBuf,
    /// `None` uses the built-in Georgia 2026 catalog.
    pub catalog_path:  Option<PathBuf>,
    pub page_source:   PageSourceKind,
    pub race_delay:    Duration,
    pub fetch_timeout: Duration,
    pub user_agent:    String,
    /// Scrape and reconcile, but print instead of writing files.
    pub dry_run:       bool,
    /// Print the run's event log as JSON lines.
    pub dump_events:   bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_repo: PathBuf::from(DEFAULT_DATA_REPO),
            catalog_path: None,
            page_source: PageSourceKind::Http,
            race_delay: DEFAULT_RACE_DELAY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            dry_run: false,
            dump_events: false,
        }
    }
}

impl RunConfig {
    /// Build from the process environment and `std::env::args()`.
    pub fn from_env() -> ScrapeResult<Self> {
        let args: Vec<String> = std::env::args().collect();
        Self::build(std::env::var(DATA_REPO_ENV).ok(), &args)
    }

    /// Build from an explicit env value and argument list (program name first).
    pub fn build(data_repo_env: Option<String>, args: &[String]) -> ScrapeResult<Self> {
        let mut config = Self::default();
        if let Some(repo) = data_repo_env.filter(|v| !v.is_empty()) {
            config.data_repo = PathBuf::from(repo);
        }

        if let Some(repo) = flag_value(args, "--data-repo") {
            config.data_repo = PathBuf::from(repo);
        }
        if let Some(path) = flag_value(args, "--races") {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = flag_value(args, "--snapshots") {
            config.page_source = PageSourceKind::Snapshots(PathBuf::from(dir));
        }
        if let Some(ms) = parse_flag::<u64>(args, "--delay-ms")? {
            config.race_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_flag::<u64>(args, "--timeout-ms")? {
            config.fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(agent) = flag_value(args, "--user-agent") {
            config.user_agent = agent.to_string();
        }
        config.dry_run = args.iter().any(|a| a == "--dry-run");
        config.dump_events = args.iter().any(|a| a == "--events");

        Ok(config)
    }

    pub fn roster_path(&self) -> PathBuf {
        roster::roster_path(&self.data_repo)
    }

    pub fn catalog(&self) -> ScrapeResult<RaceCatalog> {
        match &self.catalog_path {
            Some(path) => RaceCatalog::load(path),
            None => Ok(RaceCatalog::default()),
        }
    }

    pub fn page_source(&self) -> ScrapeResult<Box<dyn PageSource>> {
        Ok(match &self.page_source {
            PageSourceKind::Http => {
                Box::new(HttpPageSource::new(self.fetch_timeout, &self.user_agent)?)
            }
            PageSourceKind::Snapshots(dir) => Box::new(SnapshotPageSource::new(dir.clone())),
        })
    }

    pub fn clock(&self) -> RunClock {
        RunClock::new(self.race_delay)
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> ScrapeResult<Option<T>> {
    flag_value(args, flag)
        .map(|v| {
            v.parse().map_err(|_| ScrapeError::InvalidArgument {
                flag: flag.to_string(),
                value: v.to_string(),
            })
        })
        .transpose()
}
