use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response for {context} carried no data")]
    MissingData { context: String },

    /// HTTP 429. Returned per attempt, and again once the retry budget is spent.
    #[error("rate limited on {endpoint} after {attempts} attempt(s)")]
    RateLimited { endpoint: String, attempts: u32 },

    #[error("fetch did not finish within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("could not resolve profile \"{handle}\": {reason}")]
    ProfileResolution { handle: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("fetch cancelled")]
    Cancelled,
}
