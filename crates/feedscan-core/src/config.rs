use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment so
/// tests can drive it from a `HashMap`.
///
/// # Errors
///
/// Returns `ConfigError` if required vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let positive_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("FEEDSCAN_ENV", "development"))?;
    let log_level = or_default("FEEDSCAN_LOG_LEVEL", "info");

    let default_post_limit = positive_u32("DEFAULT_POST_LIMIT", "20")?;
    let deep_post_limit = positive_u32("DEEP_POST_LIMIT", "100")?;
    let ig_base_url = or_default("FEEDSCAN_IG_BASE_URL", "https://www.instagram.com");
    let ig_request_timeout_secs = parse_u64("IG_REQUEST_TIMEOUT", "30")?;
    let scrape_timeout_secs = parse_u64("FEEDSCAN_SCRAPE_TIMEOUT_SECS", "300")?;
    let max_attempts = positive_u32("FEEDSCAN_MAX_ATTEMPTS", "5")?;
    let max_backoff_secs = parse_u64("FEEDSCAN_MAX_BACKOFF_SECS", "60")?;
    let detail_max_posts = parse_usize("FEEDSCAN_DETAIL_MAX_POSTS", "12")?;
    let detail_delay_ms = parse_u64("FEEDSCAN_DETAIL_DELAY_MS", "500")?;
    let ignored_mentions = parse_handle_list(&or_default("FEEDSCAN_IGNORED_MENTIONS", "instagram"));
    let sessions_path = lookup("FEEDSCAN_SESSIONS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let openai_model = or_default("OPENAI_MODEL", "gpt-4o");
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com");
    let ai_timeout_secs = parse_timeout_secs("AI_TIMEOUT", &or_default("AI_TIMEOUT", "30"))?;

    let vpn_config_dir = PathBuf::from(or_default("VPN_CONFIG_DIR", "./vpn/configs/uk"));
    let vpn_region = or_default("VPN_REGION", "uk");
    let vpn_user = or_default("SURFSHARK_USER", "");
    let vpn_pass = or_default("SURFSHARK_PASS", "");
    let rotation_cooldown_secs = parse_u64("FEEDSCAN_ROTATION_COOLDOWN_SECS", "300")?;
    let vpn_establish_wait_secs = parse_u64("FEEDSCAN_VPN_ESTABLISH_WAIT_SECS", "15")?;
    let ip_echo_url = or_default("FEEDSCAN_IP_ECHO_URL", "https://api.ipify.org");

    Ok(AppConfig {
        env,
        log_level,
        default_post_limit,
        deep_post_limit,
        ig_base_url,
        ig_request_timeout_secs,
        scrape_timeout_secs,
        max_attempts,
        max_backoff_secs,
        detail_max_posts,
        detail_delay_ms,
        ignored_mentions,
        sessions_path,
        openai_api_key,
        openai_model,
        openai_base_url,
        ai_timeout_secs,
        vpn_config_dir,
        vpn_region,
        vpn_user,
        vpn_pass,
        rotation_cooldown_secs,
        vpn_establish_wait_secs,
        ip_echo_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDSCAN_ENV".to_string(),
            reason: format!("expected development, test or production, got \"{other}\""),
        }),
    }
}

/// Upper bound for fractional timeouts, one day.
const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// Fractional seconds, strictly positive and at most [`MAX_TIMEOUT_SECS`].
fn parse_timeout_secs(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })?;
    if !value.is_finite() || value <= 0.0 || value > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be between 0 and {MAX_TIMEOUT_SECS} seconds, got {raw}"),
        });
    }
    Ok(value)
}

/// Split a comma-separated handle list, lower-casing and dropping `@` prefixes.
fn parse_handle_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().trim_start_matches('@').to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
