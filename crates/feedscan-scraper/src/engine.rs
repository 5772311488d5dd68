//! Paginated fetch engine: bulk fetch under the retry policy, then an
//! optional per-post comment-detail stage.

use std::sync::Arc;
use std::time::Duration;

use feedscan_core::{CommentDetail, RawPost, Session};
use tokio_util::sync::CancellationToken;

use crate::error::ScraperError;
use crate::rate_limit::{retry_rate_limited, RetryPolicy};
use crate::source::ProfileSource;
use crate::types::ProfileSummary;

/// Limits for the comment-detail stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPolicy {
    /// Posts (with a non-zero comment count) that get a detail fetch.
    pub max_posts: usize,
    pub comments_per_post: u32,
    /// Pause between consecutive detail fetches.
    pub delay: Duration,
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self {
            max_posts: 12,
            comments_per_post: 50,
            delay: Duration::from_millis(500),
        }
    }
}

/// A resolved profile and its fetched posts.
#[derive(Debug, Clone)]
pub struct FetchedProfile {
    pub profile: ProfileSummary,
    pub posts: Vec<RawPost>,
}

pub struct FetchEngine {
    source: Arc<dyn ProfileSource>,
    retry: RetryPolicy,
    detail: DetailPolicy,
}

impl FetchEngine {
    #[must_use]
    pub fn new(source: Arc<dyn ProfileSource>, retry: RetryPolicy, detail: DetailPolicy) -> Self {
        Self {
            source,
            retry,
            detail,
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolves `handle`, fetches up to `limit` posts, and (when
    /// `include_detail` is set) attaches comment detail to posts that have
    /// comments.
    ///
    /// The resolve and bulk-fetch calls each run under the rate-limit retry
    /// policy, and together under `operation_timeout`. Detail failures never
    /// fail the fetch; the affected post keeps [`CommentDetail::Unavailable`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ProfileResolution`]: the profile yielded no data.
    /// - [`ScraperError::RateLimited`]: retry budget exhausted.
    /// - [`ScraperError::Timeout`]: `operation_timeout` elapsed.
    /// - [`ScraperError::Cancelled`]: `cancel` fired.
    /// - any other [`ScraperError`] from the source, unretried.
    pub async fn fetch(
        &self,
        handle: &str,
        session: &Session,
        limit: u32,
        include_detail: bool,
        cancel: &CancellationToken,
    ) -> Result<FetchedProfile, ScraperError> {
        let credential = session.cookie.as_str();
        let timeout = self.retry.operation_timeout;

        let bulk = async {
            let profile = retry_rate_limited(&self.retry, || {
                self.source.resolve_profile(handle, credential)
            })
            .await?;
            tracing::debug!(
                handle,
                profile_id = %profile.id,
                followers = profile.follower_count,
                "profile resolved"
            );

            let posts = retry_rate_limited(&self.retry, || {
                self.source.fetch_posts(&profile.id, credential, limit)
            })
            .await?;

            Ok::<_, ScraperError>(FetchedProfile { profile, posts })
        };

        let mut fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ScraperError::Cancelled),
            outcome = tokio::time::timeout(timeout, bulk) => match outcome {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!(
                        handle,
                        timeout_secs = timeout.as_secs(),
                        "fetch exceeded operation timeout"
                    );
                    return Err(ScraperError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
            },
        };

        tracing::info!(handle, posts = fetched.posts.len(), limit, "posts fetched");

        if include_detail {
            let collected = self
                .attach_comment_detail(&mut fetched.posts, credential, cancel)
                .await?;
            tracing::info!(handle, collected, "comment detail stage finished");
        }

        Ok(fetched)
    }

    /// Second stage: one best-effort comment fetch per eligible post.
    ///
    /// Returns the number of posts whose detail was collected. Only
    /// cancellation is surfaced as an error.
    async fn attach_comment_detail(
        &self,
        posts: &mut [RawPost],
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, ScraperError> {
        let mut attempted = 0usize;
        let mut collected = 0usize;

        for post in posts
            .iter_mut()
            .filter(|p| p.comment_count > 0 && !p.shortcode.is_empty())
            .take(self.detail.max_posts)
        {
            if attempted > 0 && !self.detail.delay.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ScraperError::Cancelled),
                    () = tokio::time::sleep(self.detail.delay) => {}
                }
            }
            attempted += 1;

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ScraperError::Cancelled),
                outcome = self.source.fetch_comments(
                    &post.shortcode,
                    credential,
                    self.detail.comments_per_post,
                ) => outcome,
            };

            post.comments = match outcome {
                Ok(comments) => {
                    collected += 1;
                    CommentDetail::Collected(comments)
                }
                Err(e) => {
                    tracing::warn!(
                        shortcode = %post.shortcode,
                        error = %e,
                        "comment detail unavailable; continuing without it"
                    );
                    CommentDetail::Unavailable
                }
            };
        }

        Ok(collected)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
