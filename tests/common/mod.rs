//! Common test utilities for drive-mirror integration tests

#![allow(dead_code)]

use std::sync::Arc;

use drive_mirror::{DriveConfig, DriveTransport, StaticToken};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bearer token expected by every mocked Drive endpoint
pub const TEST_TOKEN: &str = "test-access-token";

/// Drive settings pointing at the mock server
pub fn drive_config(server: &MockServer) -> DriveConfig {
    DriveConfig {
        api_base_url: format!("{}/drive/v3", server.uri()),
        supports_all_drives: false,
    }
}

/// Transport authenticated with [`TEST_TOKEN`]
pub fn drive_transport(server: &MockServer) -> DriveTransport {
    DriveTransport::new(
        reqwest::Client::new(),
        &drive_config(server),
        Arc::new(StaticToken::new(TEST_TOKEN)),
    )
    .unwrap()
}

/// Serve metadata for one item
pub async fn mount_item(server: &MockServer, id: &str, name: &str, parents: &[&str]) {
    let body = if parents.is_empty() {
        serde_json::json!({ "name": name })
    } else {
        serde_json::json!({ "name": name, "parents": parents })
    };

    let bearer = format!("Bearer {TEST_TOKEN}");
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{id}")))
        .and(query_param("fields", "name,parents"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve the content of one file
pub async fn mount_content(server: &MockServer, id: &str, content: &[u8]) {
    let bearer = format!("Bearer {TEST_TOKEN}");
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{id}")))
        .and(query_param("alt", "media"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

/// Serve metadata and content for one file
pub async fn mount_file(
    server: &MockServer,
    id: &str,
    name: &str,
    parents: &[&str],
    content: &[u8],
) {
    mount_item(server, id, name, parents).await;
    mount_content(server, id, content).await;
}
