//! HTTP client for the public profile and GraphQL feed endpoints.

mod feed;

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;

const DEFAULT_BASE_URL: &str = "https://www.instagram.com/";

/// Web app id sent by the official web client; requests without it are
/// served the login wall more often.
const WEB_APP_ID: &str = "936619743392459";

pub(crate) const POSTS_QUERY_HASH: &str = "472f257a40c653c64c666ce877d59d2b";
pub(crate) const COMMENTS_QUERY_HASH: &str = "bc3296d1ce80a24b1b6e40b1e72903f5";

/// Recent mobile browser strings; one is picked per client.
pub(crate) const MOBILE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Linux; Android 14; Pixel 8 Pro) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; SM-S928B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36",
];

/// Client for the profile feed endpoints.
///
/// Implements [`crate::ProfileSource`]. HTTP 429 surfaces as
/// [`ScraperError::RateLimited`]; every other non-2xx status surfaces as
/// [`ScraperError::UnexpectedStatus`]. This client never retries on its own;
/// retry policy belongs to [`crate::FetchEngine`].
pub struct InstagramClient {
    client: Client,
    base_url: Url,
    user_agent: &'static str,
}

impl InstagramClient {
    /// Creates a client pointed at the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let user_agent = MOBILE_USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(MOBILE_USER_AGENTS[0]);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            user_agent,
        })
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent
    }

    /// Builds the profile document URL for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::ProfileResolution`] if `handle` contains
    /// characters that cannot appear in a profile handle.
    fn profile_url(&self, handle: &str) -> Result<Url, ScraperError> {
        let valid = !handle.is_empty()
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
        if !valid {
            return Err(ScraperError::ProfileResolution {
                handle: handle.to_owned(),
                reason: "not a valid profile handle".to_owned(),
            });
        }

        let mut url = self
            .base_url
            .join(&format!("{handle}/"))
            .map_err(|e| ScraperError::ProfileResolution {
                handle: handle.to_owned(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("__a", "1")
            .append_pair("__d", "dis");
        Ok(url)
    }

    /// Builds a GraphQL query URL with JSON-encoded `variables`.
    fn graphql_url(&self, query_hash: &str, variables: &serde_json::Value) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}graphql/query/", self.base_url.path()));
        url.query_pairs_mut()
            .append_pair("query_hash", query_hash)
            .append_pair("variables", &variables.to_string());
        url
    }

    /// Sends one GET and decodes the JSON body. No retries.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        credential: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9")
            .header("X-IG-App-ID", WEB_APP_ID);

        if !credential.is_empty() {
            request = request.header(reqwest::header::COOKIE, format!("sessionid={credential}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                endpoint: url.path().to_owned(),
                attempts: 1,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
