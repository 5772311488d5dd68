//! Wire types for the public profile and GraphQL feed endpoints.
//!
//! ## Observed shapes
//!
//! ### Profile
//! The profile document nests the user under `graphql.user` on the legacy
//! `?__a=1` endpoint and under `data.user` on the newer web-profile endpoint.
//! Both are accepted. A document with neither means the request was served a
//! login wall or the profile does not exist.
//!
//! ### Timeline media
//! `edge_media_to_caption.edges` is empty (not absent) for posts without a
//! caption. Like counts appear as `edge_liked_by` on most responses and as
//! `edge_media_preview_like` on some; either is read.

use serde::Deserialize;

/// Stable identity and audience size of a resolved profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub id: String,
    pub follower_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edges<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Edges<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EdgeCount {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    #[serde(default)]
    pub graphql: Option<UserHolder<ProfileUser>>,
    #[serde(default)]
    pub data: Option<UserHolder<ProfileUser>>,
}

impl ProfileEnvelope {
    pub(crate) fn into_user(self) -> Option<ProfileUser> {
        self.graphql
            .and_then(|g| g.user)
            .or_else(|| self.data.and_then(|d| d.user))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserHolder<T> {
    #[serde(default = "Option::default")]
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileUser {
    pub id: String,
    pub edge_followed_by: EdgeCount,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostsEnvelope {
    #[serde(default)]
    pub data: Option<UserHolder<TimelineUser>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineUser {
    #[serde(default)]
    pub edge_owner_to_timeline_media: Edges<MediaNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub shortcode: String,
    #[serde(default)]
    pub edge_media_to_caption: Edges<CaptionNode>,
    #[serde(default)]
    pub edge_liked_by: Option<EdgeCount>,
    #[serde(default)]
    pub edge_media_preview_like: Option<EdgeCount>,
    #[serde(default)]
    pub edge_media_to_comment: Option<EdgeCount>,
    #[serde(default)]
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub thumbnail_src: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptionNode {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsEnvelope {
    #[serde(default)]
    pub data: Option<CommentsData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsData {
    #[serde(default)]
    pub shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShortcodeMedia {
    #[serde(default)]
    pub edge_media_to_parent_comment: Edges<CommentNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub owner: Option<CommentOwner>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentOwner {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}
