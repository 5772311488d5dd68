//! Session pools.
//!
//! Acquisition is read-only: it never changes a session's status. Status
//! transitions belong to whatever maintains the pool's backing store.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use feedscan_core::{Session, SessionStatus};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::SessionPoolError;

#[async_trait]
pub trait SessionPool: Send + Sync {
    /// One active session, or `None` when the pool has none.
    async fn acquire(&self) -> Option<Session>;
}

/// Uniform random choice among active sessions.
fn pick_active(candidates: &[Session]) -> Option<Session> {
    let active: Vec<&Session> = candidates.iter().filter(|s| s.is_active()).collect();
    active.choose(&mut rand::rng()).map(|s| (*s).clone())
}

/// Short, stable, non-reversible tag for a credential, safe to log.
#[must_use]
pub fn credential_fingerprint(credential: &str) -> String {
    if credential.is_empty() {
        return "guest".to_owned();
    }
    let digest = format!("{:x}", Sha256::digest(credential.as_bytes()));
    digest[..12].to_owned()
}

/// Fixed, process-local pool.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionPool {
    sessions: Vec<Session>,
}

impl InMemorySessionPool {
    #[must_use]
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// Single active guest session `stub-1` with an empty credential.
    #[must_use]
    pub fn guest() -> Self {
        Self::new(vec![Session {
            id: "stub-1".to_owned(),
            cookie: String::new(),
            status: SessionStatus::Active,
        }])
    }
}

#[async_trait]
impl SessionPool for InMemorySessionPool {
    async fn acquire(&self) -> Option<Session> {
        pick_active(&self.sessions)
    }
}

#[derive(Debug, Deserialize)]
struct SessionsFile {
    #[serde(default)]
    sessions: Vec<Session>,
}

/// Pool persisted as YAML:
///
/// ```yaml
/// sessions:
///   - id: b-1
///     cookie: "..."
///     status: active
/// ```
#[derive(Debug)]
pub struct FileSessionPool {
    path: PathBuf,
    sessions: RwLock<Vec<Session>>,
}

impl FileSessionPool {
    /// Reads and validates `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionPoolError`] if the file cannot be read, parsed, or
    /// contains empty or duplicate ids.
    pub async fn load(path: &Path) -> Result<Self, SessionPoolError> {
        let sessions = read_sessions(path).await?;
        tracing::info!(
            path = %path.display(),
            total = sessions.len(),
            active = sessions.iter().filter(|s| s.is_active()).count(),
            "session pool loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            sessions: RwLock::new(sessions),
        })
    }

    /// Re-reads the file and swaps the whole candidate list at once. On
    /// error the previous list stays in place.
    ///
    /// # Errors
    ///
    /// Same as [`FileSessionPool::load`].
    pub async fn reload(&self) -> Result<usize, SessionPoolError> {
        let fresh = read_sessions(&self.path).await?;
        let count = fresh.len();
        *self.sessions.write().await = fresh;
        tracing::info!(path = %self.path.display(), total = count, "session pool reloaded");
        Ok(count)
    }
}

#[async_trait]
impl SessionPool for FileSessionPool {
    async fn acquire(&self) -> Option<Session> {
        let sessions = self.sessions.read().await;
        pick_active(&sessions)
    }
}

async fn read_sessions(path: &Path) -> Result<Vec<Session>, SessionPoolError> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SessionPoolError::Io {
                path: path.display().to_string(),
                source,
            })?;
    let file: SessionsFile =
        serde_yaml::from_str(&content).map_err(|source| SessionPoolError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    validate_sessions(&file.sessions)?;
    Ok(file.sessions)
}

fn validate_sessions(sessions: &[Session]) -> Result<(), SessionPoolError> {
    let mut seen = HashSet::new();
    for session in sessions {
        if session.id.trim().is_empty() {
            return Err(SessionPoolError::Validation(
                "session id must be non-empty".to_string(),
            ));
        }
        if !seen.insert(session.id.as_str()) {
            return Err(SessionPoolError::Validation(format!(
                "duplicate session id '{}'",
                session.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
