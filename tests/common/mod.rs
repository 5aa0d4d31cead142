//! Common test utilities and helpers
//!
//! This module provides shared fixtures for the integration tests.

#![allow(dead_code)]

use hola_tunnel::config::Settings;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix the mock server serves the API under
pub const API_PREFIX: &str = "/client_cgi";

/// Test configuration factory
pub struct TestConfig;

impl TestConfig {
    /// Settings pointing at `server`
    pub fn for_server(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = format!("{}{}", server.uri(), API_PREFIX);
        settings.network.connect_timeout = 2;
        settings.network.request_timeout = 5;
        settings
    }
}

/// Canned response bodies
pub struct MockData;

impl MockData {
    /// Successful init-session body
    pub fn init_session(key: u64) -> Value {
        json!({"key": key, "misc": {"ok": true}})
    }

    /// Tunnel body with one entry for `country`
    pub fn tunnels(country: &str, entry: &str, agent_key: &str) -> Value {
        json!({
            "ztun": {country: [entry]},
            "agent_key": agent_key,
            "protocol": {"zagent1.hola.org": "https"},
            "vendor": "hola"
        })
    }
}

/// Mock server setup helpers
pub struct MockServerFactory;

impl MockServerFactory {
    /// Mount the init-session endpoint returning `body`
    pub async fn setup_init_session(server: &MockServer, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("{}/background_init", API_PREFIX)))
            .and(query_param("ext_ver", "1.15.713"))
            .and(query_param("lccgi", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// Mount the validate-session endpoint answering `status` for `session_key`
    pub async fn setup_validate_session(server: &MockServer, session_key: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("{}/rules_get_vpn.json", API_PREFIX)))
            .and(query_param("session_key", session_key))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"rules": []})))
            .mount(server)
            .await;
    }

    /// Mount the get-tunnels endpoint returning `body` for `country`
    pub async fn setup_tunnels(server: &MockServer, country: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{}/zgettunnels", API_PREFIX)))
            .and(query_param("country", country))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// Test utilities
pub struct TestUtils;

impl TestUtils {
    /// Initialize test logging
    pub fn init_logger() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
    }
}
