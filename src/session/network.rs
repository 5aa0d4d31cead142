//! HTTP transport for the Hola API
//!
//! This module builds the HTTP clients, performs GET/POST requests against
//! the configured base URL and decodes the JSON bodies.
//!
//! Two clients are prepared up front. The primary one trusts the platform's
//! root store; the fallback one trusts the bundled Mozilla roots plus an
//! optional configured PEM bundle. The fallback is used for exactly one
//! retry of a request that failed certificate verification.

use crate::{Result, config::Settings};
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN};
use reqwest::{Certificate, Client, Proxy};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Request/response collaborator used by the session client.
///
/// `endpoint` is a path plus query string relative to the API base URL.
/// Implementations report every failure as an `Err`; they never panic.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET and decode the JSON body
    async fn get(&self, endpoint: &str) -> Result<serde_json::Value>;

    /// Perform a form-encoded POST and decode the JSON body
    async fn post(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<serde_json::Value>;
}

/// Which trust store an attempt runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustStore {
    /// Platform root certificates
    Native,
    /// Bundled roots plus the configured CA bundle
    Bundled,
}

/// Run `attempt`, retrying once with the bundled trust store if the first
/// attempt failed certificate verification. Any other failure, and any
/// failure of the retry, is returned as-is.
pub async fn retry_on_certificate_error<T, F, Fut>(mut attempt: F) -> Result<T>
where
    F: FnMut(TrustStore) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match attempt(TrustStore::Native).await {
        Err(e) if e.is_certificate_error() => {
            warn!("Certificate verification failed, retrying with bundled roots: {}", e);
            attempt(TrustStore::Bundled).await.map_err(|e| match e {
                crate::Error::Network { message, .. } => crate::Error::Network {
                    message,
                    fallback_attempted: true,
                },
                other => other,
            })
        }
        other => other,
    }
}

/// reqwest-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL endpoints are appended to
    base_url: String,
    /// Client trusting the platform roots
    client: Client,
    /// Client trusting the bundled roots
    fallback_client: Client,
}

impl HttpTransport {
    /// Create a transport for the configured base URL
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::new_with_base_url(settings, settings.api.base_url.clone())
    }

    /// Create a transport for a custom base URL (for testing)
    pub fn new_with_base_url(settings: &Settings, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(settings, TrustStore::Native)?,
            fallback_client: build_client(settings, TrustStore::Bundled)?,
        })
    }

    /// Base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client_for(&self, store: TrustStore) -> &Client {
        match store {
            TrustStore::Native => &self.client,
            TrustStore::Bundled => &self.fallback_client,
        }
    }

    async fn send(
        &self,
        store: TrustStore,
        url: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<reqwest::Response> {
        let client = self.client_for(store);
        let request = match form {
            Some(form) => client.post(url).form(form),
            None => client.get(url),
        };

        request.send().await.map_err(crate::Error::from_request)
    }

    async fn execute(&self, endpoint: &str, form: Option<&[(&str, &str)]>) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        // The query carries the session key; log the path only
        debug!(
            "{} {}{}",
            if form.is_some() { "POST" } else { "GET" },
            self.base_url,
            endpoint.split('?').next().unwrap_or(endpoint)
        );

        let response = retry_on_certificate_error(|store| self.send(store, &url, form)).await?;
        decode_response(endpoint, response).await
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str) -> Result<serde_json::Value> {
        self.execute(endpoint, None).await
    }

    async fn post(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<serde_json::Value> {
        self.execute(endpoint, Some(form)).await
    }
}

/// Require a 200 status and decode the body as lossy UTF-8 JSON
async fn decode_response(endpoint: &str, response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        debug!("{} returned status {}", endpoint, status);
        return Err(crate::Error::status(
            endpoint.split('?').next().unwrap_or(endpoint),
            status.as_u16(),
        ));
    }

    let bytes = response.bytes().await.map_err(crate::Error::from_request)?;
    decode_body(&bytes)
}

/// Decode a response body, replacing invalid UTF-8 sequences before parsing
pub fn decode_body(bytes: &[u8]) -> Result<serde_json::Value> {
    let text = String::from_utf8_lossy(bytes);
    Ok(serde_json::from_str(&text)?)
}

fn default_headers(settings: &Settings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let accept_language = HeaderValue::from_str(&settings.network.accept_language)
        .map_err(|e| crate::Error::config("accept_language", &e.to_string()))?;
    let origin = HeaderValue::from_str(&settings.network.origin)
        .map_err(|e| crate::Error::config("origin", &e.to_string()))?;
    headers.insert(ACCEPT_LANGUAGE, accept_language);
    headers.insert(ORIGIN, origin);
    Ok(headers)
}

fn build_client(settings: &Settings, store: TrustStore) -> Result<Client> {
    let mut client_builder = Client::builder()
        .user_agent(&settings.network.user_agent)
        .default_headers(default_headers(settings)?)
        .connect_timeout(Duration::from_secs(settings.network.connect_timeout))
        .timeout(Duration::from_secs(settings.network.request_timeout))
        .http1_only()
        .use_rustls_tls();

    client_builder = match store {
        TrustStore::Native => client_builder
            .tls_built_in_native_certs(true)
            .tls_built_in_webpki_certs(false),
        TrustStore::Bundled => {
            let mut builder = client_builder
                .tls_built_in_native_certs(false)
                .tls_built_in_webpki_certs(true);
            if let Some(path) = &settings.network.ca_bundle {
                let pem = std::fs::read(path).map_err(|e| {
                    crate::Error::config(
                        "ca_bundle",
                        &format!("Failed to read {}: {}", path.display(), e),
                    )
                })?;
                let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
                    crate::Error::config("ca_bundle", &format!("Invalid PEM bundle: {}", e))
                })?;
                for certificate in certificates {
                    builder = builder.add_root_certificate(certificate);
                }
            }
            builder
        }
    };

    if let Some(proxy_url) = settings.get_proxy_url() {
        let proxy = Proxy::all(&proxy_url).map_err(|e| {
            crate::Error::config("proxy", &format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
        client_builder = client_builder.proxy(proxy);
    } else {
        // Proxy environment variables are already folded into the settings
        client_builder = client_builder.no_proxy();
    }

    client_builder.build().map_err(|e| {
        crate::Error::config(
            "client_builder",
            &format!("Failed to create HTTP client: {}", e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new_with_base_url(&Settings::default(), server.uri() + "/client_cgi").unwrap()
    }

    #[tokio::test]
    async fn test_certificate_error_retries_once_with_bundled_roots() {
        let attempts = Mutex::new(Vec::new());

        let result: Result<u32> = retry_on_certificate_error(|store| {
            attempts.lock().unwrap().push(store);
            async move {
                match store {
                    TrustStore::Native => Err(crate::Error::certificate("UnknownIssuer")),
                    TrustStore::Bundled => Ok(7),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(
            *attempts.lock().unwrap(),
            vec![TrustStore::Native, TrustStore::Bundled]
        );
    }

    #[tokio::test]
    async fn test_certificate_retry_happens_at_most_once() {
        let attempts = Mutex::new(0);

        let result: Result<()> = retry_on_certificate_error(|_| {
            *attempts.lock().unwrap() += 1;
            async { Err(crate::Error::certificate("UnknownIssuer")) }
        })
        .await;

        assert!(result.unwrap_err().is_certificate_error());
        assert_eq!(*attempts.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let attempts = Mutex::new(0);

        let result: Result<()> = retry_on_certificate_error(|_| {
            *attempts.lock().unwrap() += 1;
            async { Err(crate::Error::network("connection refused")) }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            crate::Error::Network {
                fallback_attempted: false,
                ..
            }
        ));
        assert_eq!(*attempts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_sends_extension_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client_cgi/rules_get_vpn.json"))
            .and(query_param("uuid", "abc"))
            .and(header("accept-language", "de"))
            .and(header(
                "origin",
                "chrome-extension://gkojfkhlekighikafcpjkiklfbnlmeio",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = transport(&mock_server)
            .get("/rules_get_vpn.json?uuid=abc")
            .await
            .unwrap();
        assert_eq!(result, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/client_cgi/background_init"))
            .and(body_string("login=1&flags=0&ver=1.15.713"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": 99})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = transport(&mock_server)
            .post(
                "/background_init?uuid=abc",
                &[("login", "1"), ("flags", "0"), ("ver", "1.15.713")],
            )
            .await
            .unwrap();
        assert_eq!(result["key"], 99);
    }

    #[tokio::test]
    async fn test_non_200_status_fails() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = transport(&mock_server)
            .get("/zgettunnels?country=us")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Status {
                status: 204,
                ref endpoint
            } if endpoint == "/zgettunnels"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_fails() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let err = transport(&mock_server).get("/zgettunnels").await.unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[tokio::test]
    async fn test_connection_error_is_network_failure() {
        let settings = Settings::default();
        let transport = HttpTransport::new_with_base_url(&settings, "http://127.0.0.1:1").unwrap();

        let err = transport.get("/zgettunnels").await.unwrap_err();
        assert!(!err.is_certificate_error());
        assert_eq!(err.category(), "network");
    }

    #[test]
    fn test_decode_body_replaces_invalid_utf8() {
        let mut body = br#"{"agent_key": "ab"#.to_vec();
        body.push(0xff);
        body.extend_from_slice(br#""}"#);

        let value = decode_body(&body).unwrap();
        assert_eq!(value["agent_key"], "ab\u{fffd}");
    }

    #[test]
    fn test_transport_trims_trailing_slash() {
        let transport =
            HttpTransport::new_with_base_url(&Settings::default(), "http://localhost/api/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost/api");
    }

    #[test]
    fn test_missing_ca_bundle_is_config_error() {
        let mut settings = Settings::default();
        settings.network.ca_bundle = Some("/nonexistent/ca_bundle.crt".into());
        let err = HttpTransport::new(&settings).unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
