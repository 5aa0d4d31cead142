//! Session and tunnel records
//!
//! Defines the credential pair a client holds and the flat proxy descriptor
//! produced from a tunnel response.

use serde::{Deserialize, Serialize};

/// Prefix of the proxy username derived from the device id
pub const PROXY_USER_PREFIX: &str = "user-uuid-";

/// Established credentials identifying this client to the service.
///
/// Both fields are non-empty; a client either holds a complete `Session`
/// or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 32-character lowercase hex device identifier
    #[serde(rename = "uuid")]
    pub device_id: String,
    /// Opaque session token issued by the service
    #[serde(rename = "sessionKey")]
    pub session_key: String,
}

impl Session {
    /// Create a session from a credential pair, if both parts are non-empty
    pub fn new(device_id: impl Into<String>, session_key: impl Into<String>) -> Option<Self> {
        let device_id = device_id.into();
        let session_key = session_key.into();
        if device_id.is_empty() || session_key.is_empty() {
            return None;
        }
        Some(Self {
            device_id,
            session_key,
        })
    }

    /// Proxy username bound to this session's device id
    pub fn proxy_username(&self) -> String {
        format!("{}{}", PROXY_USER_PREFIX, self.device_id)
    }

    /// Session key with all but the first four characters masked, for logs
    pub fn masked_key(&self) -> String {
        mask_secret(&self.session_key)
    }
}

/// Mask a credential for log output
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// A proxy endpoint allocated for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelDescriptor {
    /// Proxy hostname or IP
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// IP the service lists for `host`, if any
    #[serde(rename = "ip")]
    pub display_ip: Option<String>,
    /// Agent credential returned with the tunnel
    #[serde(rename = "agentKey")]
    pub agent_key: String,
    /// Proxy username, `user-uuid-<device id>`
    #[serde(rename = "user")]
    pub username: String,
    /// Proxy password, identical to `agent_key`
    pub password: String,
}

impl TunnelDescriptor {
    /// Build a descriptor for `session`, deriving username and password
    pub fn new(
        host: impl Into<String>,
        port: u16,
        display_ip: Option<String>,
        agent_key: impl Into<String>,
        session: &Session,
    ) -> Self {
        let agent_key = agent_key.into();
        Self {
            host: host.into(),
            port,
            display_ip,
            password: agent_key.clone(),
            agent_key,
            username: session.proxy_username(),
        }
    }

    /// `host:port` of the proxy
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Render the tunnel as a proxy URL with embedded credentials
    pub fn proxy_url(&self, scheme: &str) -> crate::Result<url::Url> {
        let mut url = url::Url::parse(&format!("{}://{}", scheme, self.address()))?;
        url.set_username(&self.username)
            .map_err(|_| crate::Error::internal("proxy URL cannot carry a username"))?;
        url.set_password(Some(&self.password))
            .map_err(|_| crate::Error::internal("proxy URL cannot carry a password"))?;
        Ok(url)
    }
}
