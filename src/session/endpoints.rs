//! Request construction for the Hola endpoints
//!
//! Every request carries the same fixed query parameters ahead of the
//! call-specific ones: `rmt_ver`, `ext_ver`, `browser`, `product`, `lccgi`.

use crate::config::ApiSettings;

/// The three endpoints the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Validate an existing uuid / session key pair
    ValidateSession,
    /// Issue a new session key
    InitSession,
    /// Fetch tunnels for a country
    GetTunnels,
}

impl Endpoint {
    /// Configured path for this endpoint
    pub fn path<'a>(&self, api: &'a ApiSettings) -> &'a str {
        match self {
            Endpoint::ValidateSession => &api.validate_session_path,
            Endpoint::InitSession => &api.init_session_path,
            Endpoint::GetTunnels => &api.tunnels_path,
        }
    }

    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::ValidateSession => "validate_session",
            Endpoint::InitSession => "init_session",
            Endpoint::GetTunnels => "get_tunnels",
        }
    }
}

/// Render `path?query` for `endpoint` with the fixed parameters prepended
pub fn build_endpoint(api: &ApiSettings, endpoint: Endpoint, query: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer
        .append_pair("rmt_ver", &api.extension_version)
        .append_pair("ext_ver", &api.extension_version)
        .append_pair("browser", &api.browser)
        .append_pair("product", &api.product)
        .append_pair("lccgi", "1");
    for (key, value) in query {
        serializer.append_pair(key, value);
    }

    format!("{}?{}", endpoint.path(api), serializer.finish())
}

/// Form body of the init-session request
pub fn init_session_form(api: &ApiSettings) -> Vec<(&'static str, String)> {
    vec![
        ("login", "1".to_string()),
        ("flags", "0".to_string()),
        ("ver", api.extension_version.clone()),
    ]
}
