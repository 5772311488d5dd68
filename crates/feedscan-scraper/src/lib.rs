//! Remote post-feed access and engagement metric extraction.
//!
//! [`FetchEngine`] drives a [`ProfileSource`] through a rate-limit-aware
//! retry loop and an optional comment-detail stage. [`MetricExtractor`] turns
//! the fetched records into [`feedscan_core::EngagementMetrics`] without I/O.

pub mod client;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod metrics;
pub mod rate_limit;
pub mod source;
pub mod types;

mod parse;

pub use client::InstagramClient;
pub use engine::{DetailPolicy, FetchEngine, FetchedProfile};
pub use error::ScraperError;
pub use metrics::MetricExtractor;
pub use rate_limit::RetryPolicy;
pub use source::ProfileSource;
pub use types::ProfileSummary;
