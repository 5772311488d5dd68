//! Cooldown-gated identity rotation over a shared, lock-guarded state.
//!
//! The whole check-then-rotate sequence runs with the [`IdentityContext`]
//! lock held, so concurrent callers that both see an expired cooldown cannot
//! both rotate: the second one observes the first one's timestamp.
//!
//! Readers never take that lock. Every state change is published to a
//! `watch` cell, so [`RotationController::snapshot`] and
//! [`RotationController::current_label`] return immediately even while a
//! rotation sits in its establishment wait.
//!
//! Rotation is not transactional against cancellation. Once a tunnel has
//! been started the new identity stays in place even if the caller gives up.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::backend::RotationBackend;
use crate::error::RotationError;

/// Label reported before the first rotation.
pub const NEVER_ROTATED_LABEL: &str = "direct";

#[derive(Debug)]
struct IdentityState {
    last_rotation: Option<Instant>,
    label: String,
    unit: Option<String>,
    rotated_at: Option<DateTime<Utc>>,
    rotation_count: u64,
}

impl IdentityState {
    fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            label: self.label.clone(),
            unit: self.unit.clone(),
            rotated_at: self.rotated_at,
            rotation_count: self.rotation_count,
        }
    }
}

/// Process-wide identity state. Create one per process and share it.
#[derive(Debug)]
pub struct IdentityContext {
    state: Mutex<IdentityState>,
    published: watch::Sender<IdentitySnapshot>,
}

impl IdentityContext {
    #[must_use]
    pub fn new() -> Self {
        let state = IdentityState {
            last_rotation: None,
            label: NEVER_ROTATED_LABEL.to_owned(),
            unit: None,
            rotated_at: None,
            rotation_count: 0,
        };
        let (published, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            published,
        }
    }

    fn publish(&self, state: &IdentityState) {
        self.published.send_replace(state.snapshot());
    }
}

impl Default for IdentityContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the identity state, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    pub label: String,
    pub unit: Option<String>,
    pub rotated_at: Option<DateTime<Utc>>,
    pub rotation_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationOutcome {
    pub identity_label: String,
    pub rotated: bool,
}

pub struct RotationController {
    backend: Arc<dyn RotationBackend>,
    context: Arc<IdentityContext>,
    establish_wait: Duration,
}

impl RotationController {
    /// `establish_wait` is the pause between launching a tunnel and asking
    /// the echo service for the new address.
    #[must_use]
    pub fn new(
        backend: Arc<dyn RotationBackend>,
        context: Arc<IdentityContext>,
        establish_wait: Duration,
    ) -> Self {
        Self {
            backend,
            context,
            establish_wait,
        }
    }

    /// Rotates unless the last rotation happened less than `cooldown` before
    /// `now`.
    ///
    /// # Errors
    ///
    /// - [`RotationError::NoUnits`] when the backend lists nothing.
    /// - [`RotationError::Spawn`] / [`RotationError::TunnelStart`] when the
    ///   tunnel cannot be replaced.
    /// - [`RotationError::Confirm`] / [`RotationError::Http`] when the new
    ///   address cannot be read after the establishment wait.
    /// - [`RotationError::Cancelled`] when `cancel` fires first.
    pub async fn maybe_rotate(
        &self,
        now: Instant,
        cooldown: Duration,
        cancel: &CancellationToken,
    ) -> Result<RotationOutcome, RotationError> {
        let mut state = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RotationError::Cancelled),
            state = self.context.state.lock() => state,
        };

        if let Some(last) = state.last_rotation {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < cooldown {
                tracing::debug!(
                    elapsed_secs = elapsed.as_secs(),
                    cooldown_secs = cooldown.as_secs(),
                    label = %state.label,
                    "identity rotation skipped; cooldown active"
                );
                return Ok(RotationOutcome {
                    identity_label: state.label.clone(),
                    rotated: false,
                });
            }
        }

        let label = self.rotate_locked(&mut state, now, cancel).await?;
        Ok(RotationOutcome {
            identity_label: label,
            rotated: true,
        })
    }

    /// Rotates regardless of the cooldown, under the same lock.
    ///
    /// # Errors
    ///
    /// Same as [`RotationController::maybe_rotate`].
    pub async fn force_rotate(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RotationOutcome, RotationError> {
        let mut state = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RotationError::Cancelled),
            state = self.context.state.lock() => state,
        };
        let label = self
            .rotate_locked(&mut state, Instant::now(), cancel)
            .await?;
        Ok(RotationOutcome {
            identity_label: label,
            rotated: true,
        })
    }

    /// Last published state. Does not wait for an in-flight rotation.
    #[must_use]
    pub fn snapshot(&self) -> IdentitySnapshot {
        self.context.published.borrow().clone()
    }

    #[must_use]
    pub fn current_label(&self) -> String {
        self.context.published.borrow().label.clone()
    }

    /// `now` stamps the rotation so the next cooldown check runs on the
    /// caller's clock.
    async fn rotate_locked(
        &self,
        state: &mut IdentityState,
        now: Instant,
        cancel: &CancellationToken,
    ) -> Result<String, RotationError> {
        let units = self.backend.list_units().await?;
        let unit = units
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(RotationError::NoUnits)?;

        if cancel.is_cancelled() {
            return Err(RotationError::Cancelled);
        }

        tracing::info!(unit = %unit.name, available = units.len(), "rotating identity");

        // Old tunnel must be gone before the new one routes traffic.
        self.backend.stop_tunnel().await?;

        // The previous address is gone; do not keep reporting it if the new
        // tunnel fails to come up.
        state.label = NEVER_ROTATED_LABEL.to_owned();
        state.unit = None;
        self.context.publish(state);

        self.backend.start_tunnel(&unit).await?;

        // From here the egress has changed; record it even if the caller
        // cancels or confirmation fails.
        state.last_rotation = Some(now);
        state.rotated_at = Some(Utc::now());
        state.unit = Some(unit.name.clone());
        state.rotation_count += 1;
        state.label = format!("unconfirmed:{}", unit.name);
        self.context.publish(state);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!(
                    unit = %unit.name,
                    "rotation cancelled during establishment wait; new tunnel left running"
                );
                return Err(RotationError::Cancelled);
            }
            () = tokio::time::sleep(self.establish_wait) => {}
        }

        let label = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RotationError::Cancelled),
            label = self.backend.confirm_identity() => label?,
        };

        state.label.clone_from(&label);
        self.context.publish(state);
        tracing::info!(
            unit = %unit.name,
            identity = %label,
            rotation_count = state.rotation_count,
            "identity rotated"
        );
        Ok(label)
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
