//! Pure metric extraction over fetched post records.

use std::collections::HashSet;
use std::sync::LazyLock;

use feedscan_core::{
    Comment, EngagementMetrics, EngagementQuality, PostSummary, RawPost, SentimentBreakdown,
};
use regex::Regex;

use crate::lexicon::{classify, is_emoji_only, Polarity};

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid regex"));
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").expect("valid regex"));

/// Turns raw posts into [`EngagementMetrics`]. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor {
    ignored_mentions: HashSet<String>,
}

impl MetricExtractor {
    /// `ignored_mentions` are handles dropped from brand mentions (the
    /// platform's own account, for example). Matching is case-insensitive.
    #[must_use]
    pub fn new<I, S>(ignored_mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored_mentions: ignored_mentions
                .into_iter()
                .map(|h| h.as_ref().trim_start_matches('@').to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn extract(&self, follower_count: u64, posts: &[RawPost]) -> EngagementMetrics {
        let recent_posts = posts
            .iter()
            .map(|p| PostSummary {
                thumbnail: p.thumbnail.clone(),
                caption: p.caption.clone(),
                timestamp: p.timestamp,
                hashtags: extract_hashtags(&p.caption),
                brand_mentions: self.extract_mentions(&p.caption),
                post_type: p.media_type,
                like_count: p.like_count,
                comment_count: p.comment_count,
            })
            .collect();

        let comments: Vec<&Comment> = posts
            .iter()
            .filter_map(|p| p.comments.comments())
            .flatten()
            .collect();

        EngagementMetrics {
            followers: follower_count,
            recent_posts,
            engagement_rate: engagement_rate(follower_count, posts),
            follower_like_ratio: follower_like_ratio(follower_count, posts),
            comment_sentiment: comment_sentiment(&comments),
            engagement_quality: engagement_quality(&comments),
        }
    }

    /// Lower-cased `@` mentions minus the ignored set, de-duplicated in
    /// first-seen order.
    #[must_use]
    pub fn extract_mentions(&self, text: &str) -> Vec<String> {
        dedup_captures(&MENTION_RE, text)
            .into_iter()
            .filter(|m| !self.ignored_mentions.contains(m))
            .collect()
    }
}

/// Lower-cased `#` tags, de-duplicated in first-seen order.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    dedup_captures(&HASHTAG_RE, text)
}

fn dedup_captures(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_lowercase()))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// `(likes + comments) / followers` as a percentage, two decimals.
#[allow(clippy::cast_precision_loss)]
fn engagement_rate(follower_count: u64, posts: &[RawPost]) -> f64 {
    if follower_count == 0 {
        return 0.0;
    }
    let interactions: u64 = posts.iter().map(|p| p.like_count + p.comment_count).sum();
    round_to(interactions as f64 / follower_count as f64 * 100.0, 2)
}

/// Mean likes per post over followers, three decimals.
#[allow(clippy::cast_precision_loss)]
fn follower_like_ratio(follower_count: u64, posts: &[RawPost]) -> f64 {
    if follower_count == 0 || posts.is_empty() {
        return 0.0;
    }
    let likes: u64 = posts.iter().map(|p| p.like_count).sum();
    let mean = likes as f64 / posts.len() as f64;
    round_to(mean / follower_count as f64, 3)
}

fn comment_sentiment(comments: &[&Comment]) -> SentimentBreakdown {
    comments
        .iter()
        .fold(SentimentBreakdown::default(), |mut acc, c| {
            match classify(&c.text) {
                Polarity::Positive => acc.positive += 1,
                Polarity::Neutral => acc.neutral += 1,
                Polarity::Negative => acc.negative += 1,
            }
            acc
        })
}

#[allow(clippy::cast_precision_loss)]
fn engagement_quality(comments: &[&Comment]) -> EngagementQuality {
    if comments.is_empty() {
        return EngagementQuality::default();
    }
    let total = comments.len() as f64;
    let emoji_only = comments.iter().filter(|c| is_emoji_only(&c.text)).count();
    let unique: HashSet<&str> = comments
        .iter()
        .map(|c| c.commenter_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    EngagementQuality {
        emoji_only_fraction: round_to(emoji_only as f64 / total, 3),
        unique_commenter_fraction: round_to(unique.len() as f64 / total, 3),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
