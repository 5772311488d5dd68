use async_trait::async_trait;
use feedscan_core::{Comment, RawPost};

use crate::error::ScraperError;
use crate::types::ProfileSummary;

/// Remote data source consumed by [`crate::FetchEngine`].
///
/// Implementations report HTTP 429 (or its equivalent) as
/// [`ScraperError::RateLimited`] so the engine can tell it apart from every
/// other failure. `credential` is an opaque session cookie; an empty string
/// means guest access.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Resolves a handle to its stable id and follower count.
    async fn resolve_profile(
        &self,
        handle: &str,
        credential: &str,
    ) -> Result<ProfileSummary, ScraperError>;

    /// Fetches up to `limit` most recent posts in one batch.
    async fn fetch_posts(
        &self,
        profile_id: &str,
        credential: &str,
        limit: u32,
    ) -> Result<Vec<RawPost>, ScraperError>;

    /// Fetches up to `limit` top-level comments of one post.
    async fn fetch_comments(
        &self,
        shortcode: &str,
        credential: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, ScraperError>;
}
