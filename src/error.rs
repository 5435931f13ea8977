use thiserror::Error;

/// Failures that abort a scrape run. Rows failing the digit-only
/// identifier guard are filtered, never surfaced here.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("section landmark not found on honorific source: {landmark}")]
    SectionNotFound { landmark: &'static str },

    #[error("honorific section yielded zero honorifics (page structure changed?)")]
    NoHonorifics,

    #[error("cache I/O failed: {0}")]
    Cache(#[from] std::io::Error),

    #[error("store write failed: {0}")]
    Persistence(#[from] rusqlite::Error),
}
