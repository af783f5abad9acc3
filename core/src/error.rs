use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid CSS selector '{selector}'")]
    InvalidSelector { selector: String },

    #[error("No rendered snapshot for race '{race_key}' at {path}")]
    MissingSnapshot { race_key: String, path: PathBuf },

    #[error("No page registered for race '{race_key}'")]
    MissingPage { race_key: String },

    #[error("Invalid value '{value}' for {flag}")]
    InvalidArgument { flag: String, value: String },

    #[error("Invalid race catalog: {reason}")]
    InvalidCatalog { reason: String },
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
