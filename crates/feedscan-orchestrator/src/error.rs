use feedscan_identity::RotationError;
use feedscan_scraper::ScraperError;
use thiserror::Error;

/// Terminal failure of one scrape. Enrichment and comment-detail problems
/// never appear here; they degrade inside the result instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not resolve profile \"{handle}\": {reason}")]
    ProfileResolution { handle: String, reason: String },

    /// Retry budget or overall fetch timeout exhausted. Callers may retry
    /// later.
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("fetch failed: {0}")]
    Fetch(#[source] ScraperError),

    #[error("identity rotation failed: {0}")]
    Rotation(#[source] RotationError),

    #[error("no active session available for a deep scrape")]
    NoSession,

    /// The caller cancelled before a result was assembled. An identity
    /// rotation that already happened stays in effect.
    #[error("scrape cancelled")]
    Cancelled,
}

impl From<ScraperError> for ScrapeError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::ProfileResolution { handle, reason } => {
                ScrapeError::ProfileResolution { handle, reason }
            }
            e @ (ScraperError::RateLimited { .. } | ScraperError::Timeout { .. }) => {
                ScrapeError::RateLimited(e.to_string())
            }
            ScraperError::Cancelled => ScrapeError::Cancelled,
            other => ScrapeError::Fetch(other),
        }
    }
}

impl From<RotationError> for ScrapeError {
    fn from(err: RotationError) -> Self {
        match err {
            RotationError::Cancelled => ScrapeError::Cancelled,
            other => ScrapeError::Rotation(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionPoolError {
    #[error("failed to read sessions file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sessions file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid sessions file: {0}")]
    Validation(String),
}
