//! The scrape state machine.
//!
//! ```text
//! Idle -> [RotatingIdentity] -> AcquiringSession -> Fetching -> Extracting -> Enriching -> Done
//! ```
//!
//! `RotatingIdentity` only runs in deep mode. Failures from rotation,
//! session acquisition and fetching are terminal; enrichment never is.

use std::sync::Arc;
use std::time::Duration;

use feedscan_core::{AppConfig, ScrapeMeta, ScrapeMode, ScrapeRequest, ScrapeResult, Session};
use feedscan_enrich::{select_samples, EnrichmentAdapter};
use feedscan_identity::RotationController;
use feedscan_scraper::{FetchEngine, MetricExtractor};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::ScrapeError;
use crate::sessions::{credential_fingerprint, SessionPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Idle,
    RotatingIdentity,
    AcquiringSession,
    Fetching,
    Extracting,
    Enriching,
    Done,
}

impl std::fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScrapeState::Idle => "idle",
            ScrapeState::RotatingIdentity => "rotating_identity",
            ScrapeState::AcquiringSession => "acquiring_session",
            ScrapeState::Fetching => "fetching",
            ScrapeState::Extracting => "extracting",
            ScrapeState::Enriching => "enriching",
            ScrapeState::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub standard_limit: u32,
    pub deep_limit: u32,
    pub rotation_cooldown: Duration,
}

impl OrchestratorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            standard_limit: config.default_post_limit,
            deep_limit: config.deep_post_limit,
            rotation_cooldown: config.rotation_cooldown(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            standard_limit: 20,
            deep_limit: 100,
            rotation_cooldown: Duration::from_secs(300),
        }
    }
}

pub struct ScrapeOrchestrator {
    engine: FetchEngine,
    rotation: Arc<RotationController>,
    sessions: Arc<dyn SessionPool>,
    extractor: MetricExtractor,
    enrichment: EnrichmentAdapter,
    settings: OrchestratorSettings,
}

impl ScrapeOrchestrator {
    #[must_use]
    pub fn new(
        engine: FetchEngine,
        rotation: Arc<RotationController>,
        sessions: Arc<dyn SessionPool>,
        extractor: MetricExtractor,
        enrichment: EnrichmentAdapter,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            engine,
            rotation,
            sessions,
            extractor,
            enrichment,
            settings,
        }
    }

    /// Runs one scrape of `handle` in `mode`.
    ///
    /// Returns a complete result (enrichment and comment detail possibly
    /// degraded to empty values) or exactly one [`ScrapeError`].
    ///
    /// If `cancel` fires after a deep-mode rotation, the rotated identity
    /// remains active for everyone else in the process.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Rotation`]: deep mode only.
    /// - [`ScrapeError::NoSession`]: deep mode only.
    /// - [`ScrapeError::ProfileResolution`], [`ScrapeError::RateLimited`],
    ///   [`ScrapeError::Fetch`]: from the fetch stage.
    /// - [`ScrapeError::Cancelled`]: `cancel` fired before the result was
    ///   assembled.
    pub async fn run_scrape(
        &self,
        handle: &str,
        mode: ScrapeMode,
        cancel: &CancellationToken,
    ) -> Result<ScrapeResult, ScrapeError> {
        let request = ScrapeRequest::for_mode(
            handle,
            mode,
            self.settings.standard_limit,
            self.settings.deep_limit,
        );
        let span = tracing::info_span!(
            "scrape",
            run_id = %uuid::Uuid::new_v4(),
            handle = %request.handle,
            mode = %mode,
        );
        self.run(request, cancel).instrument(span).await
    }

    async fn run(
        &self,
        request: ScrapeRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrapeResult, ScrapeError> {
        let mut state = ScrapeState::Idle;
        let outcome = self.run_stages(&request, cancel, &mut state).await;
        if let Err(ref e) = outcome {
            tracing::warn!(failed_in = %state, error = %e, "scrape failed");
        }
        outcome
    }

    async fn run_stages(
        &self,
        request: &ScrapeRequest,
        cancel: &CancellationToken,
        state: &mut ScrapeState,
    ) -> Result<ScrapeResult, ScrapeError> {
        let (identity_label, rotation_occurred) = match request.mode {
            ScrapeMode::Deep => {
                transition(state, ScrapeState::RotatingIdentity);
                let outcome = self
                    .rotation
                    .maybe_rotate(
                        tokio::time::Instant::now(),
                        self.settings.rotation_cooldown,
                        cancel,
                    )
                    .await?;
                (outcome.identity_label, outcome.rotated)
            }
            ScrapeMode::Standard => (self.rotation.current_label(), false),
        };

        transition(state, ScrapeState::AcquiringSession);
        let session = self.acquire_session(request.mode).await?;

        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        transition(state, ScrapeState::Fetching);
        let fetched = self
            .engine
            .fetch(
                &request.handle,
                &session,
                request.limit,
                request.fetch_engagement_detail,
                cancel,
            )
            .await?;

        transition(state, ScrapeState::Extracting);
        let metrics = self
            .extractor
            .extract(fetched.profile.follower_count, &fetched.posts);

        transition(state, ScrapeState::Enriching);
        let samples = select_samples(fetched.posts.iter().map(|p| p.caption.as_str()));
        let classification = self.enrichment.classify(&samples, cancel).await;

        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        transition(state, ScrapeState::Done);
        tracing::info!(
            identity = %identity_label,
            session_id = %session.id,
            posts = metrics.recent_posts.len(),
            followers = metrics.followers,
            engagement_rate = metrics.engagement_rate,
            rotated = rotation_occurred,
            enriched = !classification.is_empty(),
            "scrape result assembled"
        );

        Ok(ScrapeResult {
            metrics,
            classification,
            meta: ScrapeMeta {
                identity_label,
                session_id: session.id,
                requested_record_count: request.limit,
                rotation_occurred,
            },
        })
    }

    async fn acquire_session(&self, mode: ScrapeMode) -> Result<Session, ScrapeError> {
        let session = match (self.sessions.acquire().await, mode) {
            (Some(session), _) => session,
            (None, ScrapeMode::Standard) => {
                tracing::info!("no active session; continuing as guest");
                Session::guest()
            }
            (None, ScrapeMode::Deep) => return Err(ScrapeError::NoSession),
        };
        tracing::info!(
            session_id = %session.id,
            credential = %credential_fingerprint(&session.cookie),
            "session acquired"
        );
        Ok(session)
    }
}

fn transition(state: &mut ScrapeState, next: ScrapeState) {
    tracing::debug!(from = %state, to = %next, "scrape state");
    *state = next;
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
