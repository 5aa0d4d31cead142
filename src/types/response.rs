//! Response type definitions
//!
//! Typed views over the JSON bodies returned by the init-session and
//! get-tunnels endpoints. Only the fields the client reads are modelled and
//! every one of them is optional; existence is checked by the accessors.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Body of the init-session endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitSessionResponse {
    /// Issued session key; the service sends a number, `0` when refused
    #[serde(default)]
    pub key: Option<Value>,
}

impl InitSessionResponse {
    /// The issued key as a string, if present and not the numeric zero
    pub fn session_key(&self) -> Option<String> {
        let key = self.key.as_ref()?;
        if key.as_i64() == Some(0) || key.as_f64() == Some(0.0) {
            return None;
        }
        scalar_to_string(key)
    }
}

/// Body of the get-tunnels endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TunnelsResponse {
    /// Tunnel entries keyed by country code
    #[serde(default)]
    pub ztun: Option<HashMap<String, Value>>,
    /// Credential for the returned tunnels
    #[serde(default)]
    pub agent_key: Option<Value>,
    /// Display IPs keyed by tunnel host
    #[serde(default)]
    pub ip_list: Option<HashMap<String, Value>>,
}

impl TunnelsResponse {
    /// First entry listed under `country`
    pub fn first_entry(&self, country: &str) -> Option<&str> {
        self.ztun
            .as_ref()?
            .get(country)?
            .as_array()?
            .first()?
            .as_str()
    }

    /// The agent key, if present and non-empty
    pub fn agent_key(&self) -> Option<String> {
        self.agent_key.as_ref().and_then(scalar_to_string)
    }

    /// Display IP listed for `host`
    pub fn display_ip(&self, host: &str) -> Option<String> {
        self.ip_list
            .as_ref()?
            .get(host)
            .and_then(scalar_to_string)
    }
}

/// Render a JSON string or number as text; other shapes and empty strings yield `None`
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
