//! Integration tests for `InstagramClient` as a `ProfileSource`.
//!
//! Each test stands up a local `wiremock` server; no real network traffic
//! is made.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedscan_core::{CommentDetail, MediaType};
use feedscan_scraper::{InstagramClient, ProfileSource, ScraperError};

const POSTS_HASH: &str = "472f257a40c653c64c666ce877d59d2b";
const COMMENTS_HASH: &str = "bc3296d1ce80a24b1b6e40b1e72903f5";

fn test_client(server: &MockServer) -> InstagramClient {
    InstagramClient::with_base_url(&server.uri(), 5).expect("failed to build test InstagramClient")
}

fn profile_json() -> serde_json::Value {
    json!({
        "graphql": {
            "user": {
                "id": "25025320",
                "edge_followed_by": { "count": 1000 }
            }
        }
    })
}

fn timeline_json() -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "edge_owner_to_timeline_media": {
                    "edges": [
                        {
                            "node": {
                                "id": "1",
                                "shortcode": "Cabc",
                                "edge_media_to_caption": {
                                    "edges": [{ "node": { "text": "Launch day #New with @Nike" } }]
                                },
                                "edge_liked_by": { "count": 120 },
                                "edge_media_to_comment": { "count": 7 },
                                "taken_at_timestamp": 1_700_000_000,
                                "is_video": true,
                                "thumbnail_src": "https://cdn.example/1.jpg"
                            }
                        },
                        {
                            "node": {
                                "id": "2",
                                "shortcode": "Cdef",
                                "edge_media_to_caption": { "edges": [] },
                                "edge_media_preview_like": { "count": 40 },
                                "taken_at_timestamp": 1_700_000_100,
                                "is_video": false
                            }
                        }
                    ]
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// resolve_profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_profile_reads_id_and_followers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .and(query_param("__a", "1"))
        .and(query_param("__d", "dis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let profile = test_client(&server)
        .resolve_profile("nasa", "")
        .await
        .expect("profile should resolve");

    assert_eq!(profile.id, "25025320");
    assert_eq!(profile.follower_count, 1000);
}

#[tokio::test]
async fn resolve_profile_accepts_data_user_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "id": "7", "edge_followed_by": { "count": 3 } } }
        })))
        .mount(&server)
        .await;

    let profile = test_client(&server)
        .resolve_profile("nasa", "")
        .await
        .unwrap();
    assert_eq!(profile.id, "7");
}

#[tokio::test]
async fn resolve_profile_sends_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .and(header("cookie", "sessionid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).resolve_profile("nasa", "abc123").await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn resolve_profile_without_user_is_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"graphql": {}})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .resolve_profile("nasa", "")
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::ProfileResolution { ref handle, .. } if handle == "nasa"),
        "expected ProfileResolution, got: {err:?}"
    );
}

#[tokio::test]
async fn resolve_profile_login_wall_html_is_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Log in</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .resolve_profile("nasa", "")
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::ProfileResolution { .. }));
}

#[tokio::test]
async fn resolve_profile_404_is_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ghost/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .resolve_profile("ghost", "")
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::ProfileResolution { .. }));
}

#[tokio::test]
async fn resolve_profile_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nasa/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .resolve_profile("nasa", "")
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::RateLimited { attempts: 1, .. }),
        "expected RateLimited, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// fetch_posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_posts_maps_timeline_nodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .and(query_param("query_hash", POSTS_HASH))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeline_json()))
        .expect(1)
        .mount(&server)
        .await;

    let posts = test_client(&server)
        .fetch_posts("25025320", "", 20)
        .await
        .expect("posts should parse");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].caption, "Launch day #New with @Nike");
    assert_eq!(posts[0].like_count, 120);
    assert_eq!(posts[0].comment_count, 7);
    assert_eq!(posts[0].media_type, MediaType::Reel);
    assert_eq!(posts[0].shortcode, "Cabc");
    assert_eq!(posts[0].comments, CommentDetail::Unavailable);

    assert_eq!(posts[1].caption, "");
    assert_eq!(posts[1].like_count, 40);
    assert_eq!(posts[1].comment_count, 0);
    assert_eq!(posts[1].media_type, MediaType::Grid);
}

#[tokio::test]
async fn fetch_posts_without_data_is_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "fail"})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_posts("1", "", 20)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::MissingData { .. }));
}

#[tokio::test]
async fn fetch_posts_server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_posts("1", "", 20)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// fetch_comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_comments_reads_text_and_owner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graphql/query/"))
        .and(query_param("query_hash", COMMENTS_HASH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "shortcode_media": {
                    "edge_media_to_parent_comment": {
                        "edges": [
                            { "node": { "text": "so good", "owner": { "id": "11", "username": "a" } } },
                            { "node": { "text": "\u{1F525}", "owner": { "username": "b" } } }
                        ]
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let comments = test_client(&server)
        .fetch_comments("Cabc", "", 50)
        .await
        .expect("comments should parse");

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "so good");
    assert_eq!(comments[0].commenter_id, "11");
    assert_eq!(comments[1].commenter_id, "b");
}
