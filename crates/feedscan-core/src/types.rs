//! Data model shared by the fetch engine, metric extractor, enrichment
//! adapter and orchestrator.
//!
//! Output types serialize with camelCase keys and carry their metadata under
//! `_meta`, matching the JSON shape downstream consumers already read.

use serde::{Deserialize, Serialize};

/// Scrape variant selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// Latest posts, no identity rotation, guest access allowed.
    Standard,
    /// Higher volume, rotates identity and requires an authenticated session.
    Deep,
}

impl std::fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeMode::Standard => write!(f, "standard"),
            ScrapeMode::Deep => write!(f, "deep"),
        }
    }
}

/// Immutable input to one scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub handle: String,
    pub mode: ScrapeMode,
    pub limit: u32,
    pub fetch_engagement_detail: bool,
}

impl ScrapeRequest {
    /// Builds the request implied by `mode`: standard scrapes use
    /// `standard_limit` without comment detail, deep scrapes use `deep_limit`
    /// with comment detail.
    #[must_use]
    pub fn for_mode(handle: &str, mode: ScrapeMode, standard_limit: u32, deep_limit: u32) -> Self {
        let handle = handle.trim().trim_start_matches('@').to_owned();
        match mode {
            ScrapeMode::Standard => Self {
                handle,
                mode,
                limit: standard_limit,
                fetch_engagement_detail: false,
            },
            ScrapeMode::Deep => Self {
                handle,
                mode,
                limit: deep_limit,
                fetch_engagement_detail: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Exhausted,
    Pending,
}

/// An authenticated (or guest) session used against the remote source.
///
/// An empty `cookie` means guest access.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub cookie: String,
    pub status: SessionStatus,
}

impl Session {
    pub const GUEST_ID: &'static str = "guest";

    /// Unauthenticated fallback used by standard scrapes when the pool is empty.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: Self::GUEST_ID.to_owned(),
            cookie: String::new(),
            status: SessionStatus::Active,
        }
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.cookie.is_empty()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field(
                "cookie",
                &if self.cookie.is_empty() {
                    ""
                } else {
                    "[redacted]"
                },
            )
            .field("status", &self.status)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Reel,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub commenter_id: String,
}

/// Second-level engagement detail for one post.
///
/// `Unavailable` covers both "not requested" and "requested but not
/// obtainable"; neither is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommentDetail {
    #[default]
    Unavailable,
    Collected(Vec<Comment>),
}

impl CommentDetail {
    #[must_use]
    pub fn comments(&self) -> Option<&[Comment]> {
        match self {
            CommentDetail::Collected(comments) => Some(comments),
            CommentDetail::Unavailable => None,
        }
    }
}

/// One post record as produced by the fetch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: String,
    pub shortcode: String,
    pub caption: String,
    pub like_count: u64,
    pub comment_count: u64,
    /// Unix seconds.
    pub timestamp: i64,
    pub media_type: MediaType,
    pub thumbnail: String,
    pub comments: CommentDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub thumbnail: String,
    pub caption: String,
    pub timestamp: i64,
    pub hashtags: Vec<String>,
    pub brand_mentions: Vec<String>,
    pub post_type: MediaType,
    pub like_count: u64,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementQuality {
    pub emoji_only_fraction: f64,
    pub unique_commenter_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub followers: u64,
    pub recent_posts: Vec<PostSummary>,
    /// Percentage, two decimals.
    pub engagement_rate: f64,
    /// Mean likes per follower, three decimals.
    pub follower_like_ratio: f64,
    pub comment_sentiment: SentimentBreakdown,
    pub engagement_quality: EngagementQuality,
}

/// AI-assisted content classification. All fields empty when degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub content_type: String,
    pub tone: String,
    pub suggested_tags: Vec<String>,
}

impl ClassificationResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_type.is_empty() && self.tone.is_empty() && self.suggested_tags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMeta {
    pub identity_label: String,
    pub session_id: String,
    pub requested_record_count: u32,
    pub rotation_occurred: bool,
}

/// The sole successful output of a scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    #[serde(flatten)]
    pub metrics: EngagementMetrics,
    #[serde(flatten)]
    pub classification: ClassificationResult,
    #[serde(rename = "_meta")]
    pub meta: ScrapeMeta,
}
