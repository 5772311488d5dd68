//! Outbound network identity rotation.
//!
//! [`RotationController`] owns the cooldown rule over a shared
//! [`IdentityContext`]; the tunnel itself is driven through a
//! [`RotationBackend`] ([`OpenVpnBackend`] in production).

pub mod backend;
pub mod controller;
pub mod error;
pub mod openvpn;

pub use backend::{RotationBackend, RotationUnit};
pub use controller::{
    IdentityContext, IdentitySnapshot, RotationController, RotationOutcome, NEVER_ROTATED_LABEL,
};
pub use error::RotationError;
pub use openvpn::{OpenVpnBackend, OpenVpnSettings};
