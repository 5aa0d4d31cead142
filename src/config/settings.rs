//! Configuration settings
//!
//! Provides configuration loading from environment variables,
//! configuration files, and command-line overrides.
//!
//! Defaults reproduce the browser-extension context the Hola API expects:
//! the extension version, product and browser tags sent on every request,
//! and the Chrome user agent / extension origin headers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Helper functions for serde defaults
fn default_base_url() -> String {
    "https://client.hola.org/client_cgi".to_string()
}

fn default_extension_version() -> String {
    "1.15.713".to_string()
}

fn default_product() -> String {
    "cws".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

fn default_validate_session_path() -> String {
    "/rules_get_vpn.json".to_string()
}

fn default_init_session_path() -> String {
    "/background_init".to_string()
}

fn default_tunnels_path() -> String {
    "/zgettunnels".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2228.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "de".to_string()
}

fn default_origin() -> String {
    "chrome-extension://gkojfkhlekighikafcpjkiklfbnlmeio".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration settings for the Hola client
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote API location and the fixed parameters sent with every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Extension version, sent as `rmt_ver`, `ext_ver` and the init `ver` field
    #[serde(default = "default_extension_version")]
    pub extension_version: String,
    /// Product tag
    #[serde(default = "default_product")]
    pub product: String,
    /// Browser tag
    #[serde(default = "default_browser")]
    pub browser: String,
    /// Endpoint used to validate an existing uuid / session key pair
    #[serde(default = "default_validate_session_path")]
    pub validate_session_path: String,
    /// Endpoint issuing new session keys
    #[serde(default = "default_init_session_path")]
    pub init_session_path: String,
    /// Endpoint returning tunnels per country
    #[serde(default = "default_tunnels_path")]
    pub tunnels_path: String,
    /// Country used when none is given
    #[serde(default = "default_country")]
    pub default_country: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSettings {
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// `Accept-Language` header value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// `origin` header value
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Extra PEM bundle trusted by the fallback client
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
    /// HTTPS proxy URL used to reach the API
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL used to reach the API
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// All protocols proxy URL used to reach the API
    #[serde(default)]
    pub all_proxy: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            extension_version: default_extension_version(),
            product: default_product(),
            browser: default_browser(),
            validate_session_path: default_validate_session_path(),
            init_session_path: default_init_session_path(),
            tunnels_path: default_tunnels_path(),
            default_country: default_country(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            origin: default_origin(),
            ca_bundle: None,
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

fn parse_secs(name: &str, value: &str) -> crate::Result<u64> {
    value
        .parse()
        .map_err(|e| crate::Error::config(name, &format!("Invalid timeout: {}", e)))
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of the defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().apply_env()
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Override fields with any environment variables that are set
    pub fn apply_env(mut self) -> crate::Result<Self> {
        if let Ok(base_url) = std::env::var("HOLA_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(version) = std::env::var("HOLA_EXTENSION_VERSION") {
            self.api.extension_version = version;
        }

        if let Ok(country) = std::env::var("HOLA_DEFAULT_COUNTRY") {
            self.api.default_country = country.to_lowercase();
        }

        if let Ok(timeout) = std::env::var("HOLA_CONNECT_TIMEOUT") {
            self.network.connect_timeout = parse_secs("connect_timeout", &timeout)?;
        }

        if let Ok(timeout) = std::env::var("HOLA_REQUEST_TIMEOUT") {
            self.network.request_timeout = parse_secs("request_timeout", &timeout)?;
        }

        if let Ok(bundle) = std::env::var("HOLA_CA_BUNDLE") {
            self.network.ca_bundle = Some(PathBuf::from(bundle));
        }

        // Proxy settings always override if present
        if let Ok(proxy) = std::env::var("HTTPS_PROXY") {
            self.network.https_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            self.network.http_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("ALL_PROXY") {
            self.network.all_proxy = Some(proxy);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            self.logging.verbose = verbose.parse().unwrap_or(false);
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            crate::Error::config(
                "base_url",
                &format!("Invalid base URL '{}': {}", self.api.base_url, e),
            )
        })?;

        if self.api.extension_version.trim().is_empty() {
            return Err(crate::Error::config(
                "extension_version",
                "Extension version cannot be empty",
            ));
        }

        for (name, path) in [
            ("validate_session_path", &self.api.validate_session_path),
            ("init_session_path", &self.api.init_session_path),
            ("tunnels_path", &self.api.tunnels_path),
        ] {
            if !path.starts_with('/') {
                return Err(crate::Error::config(
                    name,
                    &format!("Endpoint path '{}' must start with '/'", path),
                ));
            }
        }

        if self.api.default_country.is_empty() {
            return Err(crate::Error::config(
                "default_country",
                "Default country cannot be empty",
            ));
        }

        if self.network.connect_timeout == 0 {
            return Err(crate::Error::config(
                "connect_timeout",
                "Invalid connect timeout: cannot be 0",
            ));
        }

        if self.network.request_timeout == 0 {
            return Err(crate::Error::config(
                "request_timeout",
                "Invalid request timeout: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        for (name, proxy_url) in [
            ("https_proxy", &self.network.https_proxy),
            ("http_proxy", &self.network.http_proxy),
            ("all_proxy", &self.network.all_proxy),
        ] {
            if let Some(url_str) = proxy_url
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(
                    name,
                    &format!("Invalid proxy URL '{}': {}", url_str, e),
                ));
            }
        }

        Ok(())
    }
}
