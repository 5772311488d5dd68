use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotationError {
    #[error("no rotation configuration units available")]
    NoUnits,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tunnel for {unit} did not start (exit status {status})")]
    TunnelStart { unit: String, status: String },

    #[error("could not confirm new identity: {reason}")]
    Confirm { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cancellation observed. A tunnel started before this point is left
    /// running.
    #[error("rotation cancelled")]
    Cancelled,
}
