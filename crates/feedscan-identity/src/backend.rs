use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::RotationError;

/// One selectable tunnel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationUnit {
    /// File name, used in logs and the unconfirmed label.
    pub name: String,
    pub path: PathBuf,
}

/// Tunnel operations the rotation controller drives.
#[async_trait]
pub trait RotationBackend: Send + Sync {
    /// Configuration units for the configured region. May be empty.
    async fn list_units(&self) -> Result<Vec<RotationUnit>, RotationError>;

    /// Tears down any running tunnel. Succeeds when nothing was running.
    async fn stop_tunnel(&self) -> Result<(), RotationError>;

    /// Launches a tunnel for `unit` in the background.
    async fn start_tunnel(&self, unit: &RotationUnit) -> Result<(), RotationError>;

    /// Public address currently seen by the outside world.
    async fn confirm_identity(&self) -> Result<String, RotationError>;
}
