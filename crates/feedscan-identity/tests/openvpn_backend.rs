//! Integration tests for the filesystem and echo-service parts of
//! `OpenVpnBackend`. No tunnel is started.

use std::path::PathBuf;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedscan_identity::{OpenVpnBackend, OpenVpnSettings, RotationBackend, RotationError};

fn settings(config_dir: PathBuf, echo_url: String) -> OpenVpnSettings {
    OpenVpnSettings {
        config_dir,
        region: "uk".to_owned(),
        user: "vpn-user".to_owned(),
        pass: "vpn-pass".to_owned(),
        ip_echo_url: echo_url,
    }
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feedscan-vpn-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[tokio::test]
async fn list_units_returns_sorted_region_configs() {
    let dir = scratch_dir();
    for name in ["uk-man.ovpn", "uk-lon.ovpn", "us-nyc.ovpn", "uk-notes.txt"] {
        std::fs::write(dir.join(name), "client\n").unwrap();
    }

    let backend = OpenVpnBackend::new(settings(dir.clone(), "http://127.0.0.1:1/".to_owned()))
        .unwrap();
    let units = backend.list_units().await.unwrap();

    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["uk-lon.ovpn", "uk-man.ovpn"]);
    assert_eq!(units[0].path, dir.join("uk-lon.ovpn"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn list_units_on_empty_dir_is_empty() {
    let dir = scratch_dir();
    let backend = OpenVpnBackend::new(settings(dir.clone(), "http://127.0.0.1:1/".to_owned()))
        .unwrap();
    assert!(backend.list_units().await.unwrap().is_empty());
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn list_units_on_missing_dir_is_io_error() {
    let dir = std::env::temp_dir().join(format!("feedscan-missing-{}", uuid::Uuid::new_v4()));
    let backend = OpenVpnBackend::new(settings(dir, "http://127.0.0.1:1/".to_owned())).unwrap();
    let err = backend.list_units().await.unwrap_err();
    assert!(matches!(err, RotationError::Io { .. }), "got: {err:?}");
}

#[tokio::test]
async fn confirm_identity_returns_trimmed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.23\n"))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        OpenVpnBackend::new(settings(scratch_dir(), format!("{}/", server.uri()))).unwrap();
    let label = backend.confirm_identity().await.unwrap();
    assert_eq!(label, "198.51.100.23");
}

#[tokio::test]
async fn confirm_identity_error_status_is_confirm_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend =
        OpenVpnBackend::new(settings(scratch_dir(), format!("{}/", server.uri()))).unwrap();
    let err = backend.confirm_identity().await.unwrap_err();
    assert!(matches!(err, RotationError::Confirm { .. }), "got: {err:?}");
}

#[tokio::test]
async fn confirm_identity_empty_body_is_confirm_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let backend =
        OpenVpnBackend::new(settings(scratch_dir(), format!("{}/", server.uri()))).unwrap();
    let err = backend.confirm_identity().await.unwrap_err();
    assert!(matches!(err, RotationError::Confirm { .. }));
}
