//! Shared data model and configuration for the feedscan workspace.

pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use types::{
    ClassificationResult, Comment, CommentDetail, EngagementMetrics, EngagementQuality, MediaType,
    PostSummary, RawPost, ScrapeMeta, ScrapeMode, ScrapeRequest, ScrapeResult,
    SentimentBreakdown, Session, SessionStatus,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
