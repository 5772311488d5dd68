use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub default_post_limit: u32,
    pub deep_post_limit: u32,
    pub ig_base_url: String,
    pub ig_request_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub max_attempts: u32,
    pub max_backoff_secs: u64,
    pub detail_max_posts: usize,
    pub detail_delay_ms: u64,
    pub ignored_mentions: Vec<String>,
    pub sessions_path: Option<PathBuf>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub ai_timeout_secs: f64,
    pub vpn_config_dir: PathBuf,
    pub vpn_region: String,
    pub vpn_user: String,
    pub vpn_pass: String,
    pub rotation_cooldown_secs: u64,
    pub vpn_establish_wait_secs: u64,
    pub ip_echo_url: String,
}

impl AppConfig {
    #[must_use]
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.ai_timeout_secs)
    }

    #[must_use]
    pub fn rotation_cooldown(&self) -> Duration {
        Duration::from_secs(self.rotation_cooldown_secs)
    }

    /// Tunnel credentials are mandatory in production, but only for the
    /// commands that rotate identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first empty credential.
    pub fn require_vpn_credentials(&self) -> Result<(), ConfigError> {
        if self.env != Environment::Production {
            return Ok(());
        }
        if self.vpn_user.is_empty() {
            return Err(ConfigError::MissingEnvVar("SURFSHARK_USER".to_string()));
        }
        if self.vpn_pass.is_empty() {
            return Err(ConfigError::MissingEnvVar("SURFSHARK_PASS".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("default_post_limit", &self.default_post_limit)
            .field("deep_post_limit", &self.deep_post_limit)
            .field("ig_base_url", &self.ig_base_url)
            .field("ig_request_timeout_secs", &self.ig_request_timeout_secs)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("max_backoff_secs", &self.max_backoff_secs)
            .field("detail_max_posts", &self.detail_max_posts)
            .field("detail_delay_ms", &self.detail_delay_ms)
            .field("ignored_mentions", &self.ignored_mentions)
            .field("sessions_path", &self.sessions_path)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("vpn_config_dir", &self.vpn_config_dir)
            .field("vpn_region", &self.vpn_region)
            .field("vpn_user", &self.vpn_user)
            .field("vpn_pass", &"[redacted]")
            .field("rotation_cooldown_secs", &self.rotation_cooldown_secs)
            .field("vpn_establish_wait_secs", &self.vpn_establish_wait_secs)
            .field("ip_echo_url", &self.ip_echo_url)
            .finish()
    }
}
