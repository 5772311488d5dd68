//! [`RotationBackend`] over the `openvpn` binary and a public IP echo service.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use feedscan_core::AppConfig;

use crate::backend::{RotationBackend, RotationUnit};
use crate::error::RotationError;

const AUTH_FILE_NAME: &str = "vpn-auth.txt";
const ECHO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct OpenVpnSettings {
    /// Directory holding `<region>-*.ovpn` files.
    pub config_dir: PathBuf,
    pub region: String,
    pub user: String,
    pub pass: String,
    pub ip_echo_url: String,
}

impl OpenVpnSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            config_dir: config.vpn_config_dir.clone(),
            region: config.vpn_region.clone(),
            user: config.vpn_user.clone(),
            pass: config.vpn_pass.clone(),
            ip_echo_url: config.ip_echo_url.clone(),
        }
    }
}

impl std::fmt::Debug for OpenVpnSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenVpnSettings")
            .field("config_dir", &self.config_dir)
            .field("region", &self.region)
            .field("user", &self.user)
            .field("pass", &"[redacted]")
            .field("ip_echo_url", &self.ip_echo_url)
            .finish()
    }
}

#[derive(Debug)]
pub struct OpenVpnBackend {
    settings: OpenVpnSettings,
    echo: reqwest::Client,
}

impl OpenVpnBackend {
    /// # Errors
    ///
    /// Returns [`RotationError::Http`] if the echo client cannot be built.
    pub fn new(settings: OpenVpnSettings) -> Result<Self, RotationError> {
        let echo = reqwest::Client::builder().timeout(ECHO_TIMEOUT).build()?;
        Ok(Self { settings, echo })
    }

    fn auth_file(&self) -> PathBuf {
        self.settings.config_dir.join(AUTH_FILE_NAME)
    }

    /// Writes `user\npass\n` for `--auth-user-pass`, owner-readable only.
    async fn write_auth_file(&self, path: &Path) -> Result<(), RotationError> {
        let contents = format!("{}\n{}\n", self.settings.user, self.settings.pass);
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| RotationError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|source| RotationError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        Ok(())
    }

    fn is_unit_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&format!("{}-", self.settings.region))
            && Path::new(file_name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ovpn"))
    }
}

#[async_trait]
impl RotationBackend for OpenVpnBackend {
    async fn list_units(&self) -> Result<Vec<RotationUnit>, RotationError> {
        let dir = &self.settings.config_dir;
        let io_err = |source| RotationError::Io {
            path: dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut units = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_unit_file(&name) {
                units.push(RotationUnit {
                    name,
                    path: entry.path(),
                });
            }
        }
        units.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(units)
    }

    async fn stop_tunnel(&self) -> Result<(), RotationError> {
        let (program, args): (&str, &[&str]) = if cfg!(windows) {
            ("taskkill", &["/IM", "openvpn.exe", "/F"])
        } else {
            ("pkill", &["-9", "-f", "openvpn"])
        };

        let status = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| RotationError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        // Non-zero here usually means nothing was running.
        tracing::debug!(program, %status, "tunnel stop issued");
        Ok(())
    }

    async fn start_tunnel(&self, unit: &RotationUnit) -> Result<(), RotationError> {
        let auth_file = self.auth_file();
        self.write_auth_file(&auth_file).await?;

        let status = tokio::process::Command::new("openvpn")
            .arg("--config")
            .arg(&unit.path)
            .arg("--auth-user-pass")
            .arg(&auth_file)
            .args(["--redirect-gateway", "def1", "--daemon"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| RotationError::Spawn {
                program: "openvpn".to_owned(),
                source,
            })?;

        if !status.success() {
            return Err(RotationError::TunnelStart {
                unit: unit.name.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    async fn confirm_identity(&self) -> Result<String, RotationError> {
        let response = self
            .echo
            .get(&self.settings.ip_echo_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| RotationError::Confirm {
                reason: e.to_string(),
            })?;

        let label = response.text().await?.trim().to_owned();
        if label.is_empty() {
            return Err(RotationError::Confirm {
                reason: "echo service returned an empty body".to_owned(),
            });
        }
        Ok(label)
    }
}
