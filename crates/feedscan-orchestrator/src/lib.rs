//! Scrape orchestration: identity rotation, session choice, fetch, metric
//! extraction and enrichment composed into one [`ScrapeOrchestrator::run_scrape`].

pub mod error;
pub mod orchestrator;
pub mod sessions;

pub use error::{ScrapeError, SessionPoolError};
pub use orchestrator::{OrchestratorSettings, ScrapeOrchestrator, ScrapeState};
pub use sessions::{
    credential_fingerprint, FileSessionPool, InMemorySessionPool, SessionPool,
};
