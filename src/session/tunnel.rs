//! Tunnel payload parsing
//!
//! The tunnel endpoint lists entries such as `"HTTP zagent12.hola.org:22222"`
//! under each country code. The first `host:port` token of the first entry
//! is taken; anything around it is ignored. Ports are ASCII digits only.

use crate::{
    Result,
    types::{Session, TunnelDescriptor, TunnelsResponse},
};
use regex::Regex;
use std::sync::LazyLock;

static HOST_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.]+:[0-9]{1,5}").expect("host:port pattern is valid")
});

/// Extract host and port from a tunnel entry.
///
/// Returns `None` when the entry holds no `host:port` token, or when the
/// first token's port is outside 1-65535.
pub fn extract_host_port(entry: &str) -> Option<(String, u16)> {
    let token = HOST_PORT.find(entry)?.as_str();
    let (host, port) = token.split_once(':')?;
    let port: u16 = port.parse().ok()?;
    if port == 0 {
        return None;
    }
    Some((host.to_string(), port))
}

/// Turn a get-tunnels body into a descriptor for `session`.
///
/// `country` must already be lower-cased; it is used as the lookup key.
pub fn parse_tunnel_response(
    body: serde_json::Value,
    country: &str,
    session: &Session,
) -> Result<TunnelDescriptor> {
    let response: TunnelsResponse = serde_json::from_value(body)
        .map_err(|e| crate::Error::malformed_tunnel(country, &format!("undecodable body: {}", e)))?;

    let entry = response
        .first_entry(country)
        .ok_or_else(|| crate::Error::malformed_tunnel(country, "no entry for country"))?;

    let agent_key = response
        .agent_key()
        .ok_or_else(|| crate::Error::malformed_tunnel(country, "agent_key missing"))?;

    let (host, port) = extract_host_port(entry).ok_or_else(|| {
        crate::Error::malformed_tunnel(country, &format!("no host:port in entry '{}'", entry))
    })?;

    let display_ip = response.display_ip(&host);
    if display_ip.is_none() {
        tracing::debug!("No display IP listed for tunnel host {}", host);
    }

    Ok(TunnelDescriptor::new(host, port, display_ip, agent_key, session))
}
