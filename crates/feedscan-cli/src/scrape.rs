use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use feedscan_core::{AppConfig, ScrapeMode};
use feedscan_enrich::EnrichmentAdapter;
use feedscan_identity::{IdentityContext, OpenVpnBackend, OpenVpnSettings, RotationController};
use feedscan_orchestrator::{
    FileSessionPool, InMemorySessionPool, OrchestratorSettings, ScrapeOrchestrator, SessionPool,
};
use feedscan_scraper::{DetailPolicy, FetchEngine, InstagramClient, MetricExtractor, RetryPolicy};
use tokio_util::sync::CancellationToken;

pub(crate) fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.max_attempts,
        max_backoff: Duration::from_secs(config.max_backoff_secs),
        operation_timeout: Duration::from_secs(config.scrape_timeout_secs),
        ..RetryPolicy::default()
    }
}

/// Rotating commands need tunnel credentials; standard scrapes only read the
/// current label and run without them.
pub(crate) fn ensure_rotation_ready(
    config: &AppConfig,
    mode: Option<ScrapeMode>,
) -> anyhow::Result<()> {
    if mode == Some(ScrapeMode::Standard) {
        return Ok(());
    }
    config
        .require_vpn_credentials()
        .context("identity rotation is not configured")
}

pub(crate) fn detail_policy(config: &AppConfig) -> DetailPolicy {
    DetailPolicy {
        max_posts: config.detail_max_posts,
        delay: Duration::from_millis(config.detail_delay_ms),
        ..DetailPolicy::default()
    }
}

fn build_rotation(config: &AppConfig) -> anyhow::Result<Arc<RotationController>> {
    let backend = OpenVpnBackend::new(OpenVpnSettings::from_config(config))
        .context("failed to build VPN backend")?;
    Ok(Arc::new(RotationController::new(
        Arc::new(backend),
        Arc::new(IdentityContext::new()),
        Duration::from_secs(config.vpn_establish_wait_secs),
    )))
}

async fn build_sessions(config: &AppConfig) -> anyhow::Result<Arc<dyn SessionPool>> {
    match &config.sessions_path {
        Some(path) => {
            let pool = FileSessionPool::load(path)
                .await
                .with_context(|| format!("failed to load sessions from {}", path.display()))?;
            Ok(Arc::new(pool))
        }
        None => {
            tracing::info!("FEEDSCAN_SESSIONS_PATH not set; using the guest session stub");
            Ok(Arc::new(InMemorySessionPool::guest()))
        }
    }
}

async fn build_orchestrator(config: &AppConfig) -> anyhow::Result<ScrapeOrchestrator> {
    let client = InstagramClient::with_base_url(&config.ig_base_url, config.ig_request_timeout_secs)
        .context("failed to build feed client")?;
    let engine = FetchEngine::new(
        Arc::new(client),
        retry_policy(config),
        detail_policy(config),
    );

    let enrichment =
        EnrichmentAdapter::from_config(config).context("failed to build classifier")?;
    if !enrichment.is_configured() {
        tracing::info!("OPENAI_API_KEY not set; classification fields will be empty");
    }

    Ok(ScrapeOrchestrator::new(
        engine,
        build_rotation(config)?,
        build_sessions(config).await?,
        MetricExtractor::new(&config.ignored_mentions),
        enrichment,
        OrchestratorSettings::from_config(config),
    ))
}

pub(crate) async fn run_scrape(
    config: &AppConfig,
    handle: &str,
    mode: ScrapeMode,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    ensure_rotation_ready(config, Some(mode))?;
    let orchestrator = build_orchestrator(config).await?;
    let result = orchestrator.run_scrape(handle, mode, cancel).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) async fn run_rotate(config: &AppConfig, cancel: &CancellationToken) -> anyhow::Result<()> {
    ensure_rotation_ready(config, None)?;
    let rotation = build_rotation(config)?;
    let outcome = rotation.force_rotate(cancel).await?;
    tracing::info!(identity = %outcome.identity_label, "rotation complete");
    println!("{}", serde_json::to_string_pretty(&rotation.snapshot())?);
    Ok(())
}
