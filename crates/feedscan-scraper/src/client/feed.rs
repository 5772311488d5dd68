//! [`ProfileSource`] implementation for [`InstagramClient`].

use async_trait::async_trait;
use feedscan_core::{Comment, RawPost};
use serde_json::json;

use super::{InstagramClient, COMMENTS_QUERY_HASH, POSTS_QUERY_HASH};
use crate::error::ScraperError;
use crate::parse::{comment_node_to_comment, media_to_raw_post};
use crate::source::ProfileSource;
use crate::types::{CommentsEnvelope, PostsEnvelope, ProfileEnvelope, ProfileSummary};

#[async_trait]
impl ProfileSource for InstagramClient {
    /// # Errors
    ///
    /// - [`ScraperError::ProfileResolution`]: HTTP 404, a non-JSON body
    ///   (login wall), or a document without a user.
    /// - [`ScraperError::RateLimited`]: HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] / [`ScraperError::Http`] otherwise.
    async fn resolve_profile(
        &self,
        handle: &str,
        credential: &str,
    ) -> Result<ProfileSummary, ScraperError> {
        let url = self.profile_url(handle)?;
        let context = format!("profile document for {handle}");

        let envelope = match self.get_json::<ProfileEnvelope>(url, credential, &context).await {
            Ok(envelope) => envelope,
            Err(ScraperError::UnexpectedStatus { status: 404, .. }) => {
                return Err(ScraperError::ProfileResolution {
                    handle: handle.to_owned(),
                    reason: "profile not found (HTTP 404)".to_owned(),
                });
            }
            Err(ScraperError::Deserialize { source, .. }) => {
                return Err(ScraperError::ProfileResolution {
                    handle: handle.to_owned(),
                    reason: format!("profile document is not JSON ({source}); login wall or blocked identity"),
                });
            }
            Err(e) => return Err(e),
        };

        let user = envelope
            .into_user()
            .ok_or_else(|| ScraperError::ProfileResolution {
                handle: handle.to_owned(),
                reason: "profile document missing; login required or identity flagged".to_owned(),
            })?;

        Ok(ProfileSummary {
            id: user.id,
            follower_count: user.edge_followed_by.count,
        })
    }

    async fn fetch_posts(
        &self,
        profile_id: &str,
        credential: &str,
        limit: u32,
    ) -> Result<Vec<RawPost>, ScraperError> {
        let url = self.graphql_url(POSTS_QUERY_HASH, &json!({"id": profile_id, "first": limit}));
        let context = format!("timeline media for profile {profile_id}");

        let envelope = self
            .get_json::<PostsEnvelope>(url, credential, &context)
            .await?;
        let user = envelope
            .data
            .and_then(|d| d.user)
            .ok_or(ScraperError::MissingData { context })?;

        Ok(user
            .edge_owner_to_timeline_media
            .edges
            .into_iter()
            .map(|edge| media_to_raw_post(edge.node))
            .collect())
    }

    async fn fetch_comments(
        &self,
        shortcode: &str,
        credential: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, ScraperError> {
        let url = self.graphql_url(
            COMMENTS_QUERY_HASH,
            &json!({"shortcode": shortcode, "first": limit}),
        );
        let context = format!("comments for post {shortcode}");

        let envelope = self
            .get_json::<CommentsEnvelope>(url, credential, &context)
            .await?;
        let media = envelope
            .data
            .and_then(|d| d.shortcode_media)
            .ok_or(ScraperError::MissingData { context })?;

        Ok(media
            .edge_media_to_parent_comment
            .edges
            .into_iter()
            .map(|edge| comment_node_to_comment(edge.node))
            .collect())
    }
}
