use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FEEDSCAN_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults must be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.default_post_limit, 20);
    assert_eq!(cfg.deep_post_limit, 100);
    assert_eq!(cfg.ig_base_url, "https://www.instagram.com");
    assert_eq!(cfg.ig_request_timeout_secs, 30);
    assert_eq!(cfg.scrape_timeout_secs, 300);
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.max_backoff_secs, 60);
    assert_eq!(cfg.detail_max_posts, 12);
    assert_eq!(cfg.detail_delay_ms, 500);
    assert_eq!(cfg.ignored_mentions, vec!["instagram".to_string()]);
    assert!(cfg.sessions_path.is_none());
    assert!(cfg.openai_api_key.is_none());
    assert_eq!(cfg.openai_model, "gpt-4o");
    assert!((cfg.ai_timeout_secs - 30.0).abs() < f64::EPSILON);
    assert_eq!(cfg.vpn_region, "uk");
    assert_eq!(cfg.rotation_cooldown_secs, 300);
    assert_eq!(cfg.vpn_establish_wait_secs, 15);
    assert_eq!(cfg.ip_echo_url, "https://api.ipify.org");
}

#[test]
fn post_limits_override() {
    let mut map = HashMap::new();
    map.insert("DEFAULT_POST_LIMIT", "12");
    map.insert("DEEP_POST_LIMIT", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_post_limit, 12);
    assert_eq!(cfg.deep_post_limit, 250);
}

#[test]
fn zero_post_limit_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DEEP_POST_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEEP_POST_LIMIT"),
        "expected InvalidEnvVar(DEEP_POST_LIMIT), got: {result:?}"
    );
}

#[test]
fn non_numeric_request_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("IG_REQUEST_TIMEOUT", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "IG_REQUEST_TIMEOUT"),
        "expected InvalidEnvVar(IG_REQUEST_TIMEOUT), got: {result:?}"
    );
}

#[test]
fn fractional_ai_timeout_is_accepted() {
    let mut map = HashMap::new();
    map.insert("AI_TIMEOUT", "2.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ai_timeout(), std::time::Duration::from_millis(2500));
}

#[test]
fn negative_ai_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("AI_TIMEOUT", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AI_TIMEOUT"),
        "expected InvalidEnvVar(AI_TIMEOUT), got: {result:?}"
    );
}

#[test]
fn blank_openai_key_counts_as_unconfigured() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.openai_api_key.is_none());
}

#[test]
fn ignored_mentions_are_normalized() {
    let mut map = HashMap::new();
    map.insert("FEEDSCAN_IGNORED_MENTIONS", "Instagram, @Meta ,,threads");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ignored_mentions, vec!["instagram", "meta", "threads"]);
}

#[test]
fn sessions_path_is_read_when_set() {
    let mut map = HashMap::new();
    map.insert("FEEDSCAN_SESSIONS_PATH", "./config/sessions.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.sessions_path.as_deref(),
        Some(std::path::Path::new("./config/sessions.yaml"))
    );
}

#[test]
fn production_loads_without_vpn_credentials() {
    let mut map = HashMap::new();
    map.insert("FEEDSCAN_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
}

#[test]
fn production_rotation_requires_vpn_credentials() {
    let mut map = HashMap::new();
    map.insert("FEEDSCAN_ENV", "production");
    map.insert("SURFSHARK_USER", "user");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.require_vpn_credentials();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SURFSHARK_PASS"),
        "expected MissingEnvVar(SURFSHARK_PASS), got: {result:?}"
    );
}

#[test]
fn development_rotation_allows_empty_vpn_credentials() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.require_vpn_credentials().is_ok());
}

#[test]
fn huge_ai_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("AI_TIMEOUT", "1e30");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AI_TIMEOUT"),
        "expected InvalidEnvVar(AI_TIMEOUT), got: {result:?}"
    );
}

#[test]
fn fractional_ai_timeout_up_to_a_day_is_accepted() {
    let mut map = HashMap::new();
    map.insert("AI_TIMEOUT", "86400");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ai_timeout(), Duration::from_secs(86_400));
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-very-secret");
    map.insert("SURFSHARK_PASS", "hunter2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-very-secret"));
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("[redacted]"));
}
