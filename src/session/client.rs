//! # Session & Tunnel Client
//!
//! [`HolaClientGeneric`] owns the session lifecycle against the Hola API and
//! turns tunnel responses into [`TunnelDescriptor`]s.
//!
//! ## Session lifecycle
//!
//! A client starts without a session. [`init_session`](HolaClientGeneric::init_session)
//! establishes one, either by validating caller-supplied credentials or by
//! generating a device id and asking the service for a new session key. Once
//! established the session is only replaced by another `init_session` call;
//! a failed tunnel request leaves it untouched.
//!
//! ## Failure handling
//!
//! Public operations never return errors. Every failure is logged and
//! reported as `false` / `None`; callers tell failures apart only by which
//! operation failed.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use hola_tunnel::{HolaClient, Settings};
//!
//! # tokio_test::block_on(async {
//! let client = HolaClient::connect(Settings::default(), None).await?;
//!
//! if let Some(tunnel) = client.get_tunnels("DE").await {
//!     println!("proxy {}:{} as {}", tunnel.host, tunnel.port, tunnel.username);
//! }
//!
//! // Keep these to reuse the session in a later process
//! let saved = client.get_session().cloned();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

use crate::{
    Result,
    config::Settings,
    error::{format_error, format_error_for_logging},
    session::{
        device::generate_device_id,
        endpoints::{Endpoint, build_endpoint, init_session_form},
        network::{HttpTransport, Transport},
        tunnel::parse_tunnel_response,
    },
    types::{InitSessionResponse, Session, TunnelDescriptor},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Convenience type alias for the client over the reqwest transport
pub type HolaClient = HolaClientGeneric<HttpTransport>;

/// Client for the Hola session and tunnel endpoints
#[derive(Debug)]
pub struct HolaClientGeneric<T: Transport = HttpTransport> {
    /// Configuration settings, fixed for the client's lifetime
    settings: Arc<Settings>,
    /// Request/response collaborator
    transport: T,
    /// Active credentials; never half-populated
    session: Option<Session>,
    /// Source of fresh device ids
    device_id_generator: fn() -> String,
}

impl HolaClientGeneric<HttpTransport> {
    /// Creates a client over HTTP and establishes a session.
    ///
    /// With `credentials` the pair is validated and adopted; without, a new
    /// session is requested. An `Err` means only that the HTTP transport could
    /// not be built from `settings`; a failed session shows up as
    /// [`get_session`](Self::get_session) returning `None`.
    pub async fn connect(settings: Settings, credentials: Option<Session>) -> Result<Self> {
        settings.validate()?;
        let transport = HttpTransport::new(&settings)?;
        Ok(Self::with_transport(settings, transport, credentials).await)
    }
}

impl<T: Transport> HolaClientGeneric<T> {
    /// Create a client over `transport` without establishing a session
    pub fn new(settings: Settings, transport: T) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            session: None,
            device_id_generator: generate_device_id,
        }
    }

    /// Create a client over `transport` and establish a session
    pub async fn with_transport(
        settings: Settings,
        transport: T,
        credentials: Option<Session>,
    ) -> Self {
        let mut client = Self::new(settings, transport);
        let (device_id, session_key) = match &credentials {
            Some(session) => (Some(session.device_id.as_str()), Some(session.session_key.as_str())),
            None => (None, None),
        };
        client.init_session(device_id, session_key).await;
        client
    }

    /// Replace the device id generator used for fresh sessions
    pub fn with_device_id_generator(mut self, generator: fn() -> String) -> Self {
        self.device_id_generator = generator;
        self
    }

    /// Settings this client was created with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Establish a session.
    ///
    /// If both `device_id` and `session_key` are non-empty they are validated
    /// against the service and adopted on success; a rejected pair does not
    /// fall through to creating a new session. Otherwise a new device id is
    /// generated and a session key is requested for it.
    ///
    /// Returns whether a session is now established. On failure the client
    /// holds no session.
    pub async fn init_session(&mut self, device_id: Option<&str>, session_key: Option<&str>) -> bool {
        let supplied = device_id
            .filter(|id| !id.is_empty())
            .zip(session_key.filter(|key| !key.is_empty()));

        let outcome = match supplied {
            Some((device_id, session_key)) => self.validate_session(device_id, session_key).await,
            None => self.issue_session().await,
        };

        match outcome {
            Ok(session) => {
                info!(
                    "Session established for device {} (key {})",
                    session.device_id,
                    session.masked_key()
                );
                self.session = Some(session);
                true
            }
            Err(e) => {
                warn!(
                    details = %format_error_for_logging(&e),
                    "Failed to establish session: {}",
                    format_error(&e)
                );
                self.session = None;
                false
            }
        }
    }

    /// Active credentials, if a session is established
    pub fn get_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is established
    pub fn is_established(&self) -> bool {
        self.session.is_some()
    }

    /// Request a tunnel for `country_code`.
    ///
    /// The code is lower-cased before it is sent and before it is used to
    /// look up the response. Returns `None` when there is no session, the
    /// request fails, or the response lacks a usable entry or agent key.
    pub async fn get_tunnels(&self, country_code: &str) -> Option<TunnelDescriptor> {
        let country = country_code.to_lowercase();

        match self.fetch_tunnel(&country).await {
            Ok(tunnel) => {
                debug!(
                    "Tunnel for '{}': {} (display ip {:?})",
                    country,
                    tunnel.address(),
                    tunnel.display_ip
                );
                Some(tunnel)
            }
            Err(e) => {
                warn!(
                    details = %format_error_for_logging(&e),
                    "Failed to get tunnel for '{}': {}",
                    country,
                    format_error(&e)
                );
                None
            }
        }
    }

    /// Request a tunnel for the configured default country (`us`)
    pub async fn get_default_tunnels(&self) -> Option<TunnelDescriptor> {
        let country = self.settings.api.default_country.clone();
        self.get_tunnels(&country).await
    }

    async fn validate_session(&self, device_id: &str, session_key: &str) -> Result<Session> {
        debug!("Validating supplied session for device {}", device_id);
        let body = self
            .request(
                Endpoint::ValidateSession,
                &[("uuid", device_id), ("session_key", session_key)],
                None,
            )
            .await
            .map_err(|e| {
                crate::Error::session("validate", &format!("credentials rejected: {}", e))
            })?;

        if body == serde_json::Value::Bool(false) {
            return Err(crate::Error::session("validate", "service answered false"));
        }

        Session::new(device_id, session_key)
            .ok_or_else(|| crate::Error::internal("validated credentials are empty"))
    }

    async fn issue_session(&self) -> Result<Session> {
        let device_id = (self.device_id_generator)();
        debug!("Requesting new session for device {}", device_id);

        let form = init_session_form(&self.settings.api);
        let form: Vec<(&str, &str)> = form.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let body = self
            .request(Endpoint::InitSession, &[("uuid", device_id.as_str())], Some(form.as_slice()))
            .await?;
        let response: InitSessionResponse = serde_json::from_value(body)?;

        let session_key = response
            .session_key()
            .ok_or_else(|| crate::Error::session("init", "response carried no usable key"))?;

        Session::new(device_id, session_key)
            .ok_or_else(|| crate::Error::internal("generated device id is empty"))
    }

    async fn fetch_tunnel(&self, country: &str) -> Result<TunnelDescriptor> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| crate::Error::session("tunnels", "no established session"))?;

        let body = self
            .request(
                Endpoint::GetTunnels,
                &[
                    ("uuid", session.device_id.as_str()),
                    ("session_key", session.session_key.as_str()),
                    ("country", country),
                ],
                None,
            )
            .await?;
        parse_tunnel_response(body, country, session)
    }

    /// Send one request to `endpoint`; a form turns it into a POST
    async fn request(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
        form: Option<&[(&str, &str)]>,
    ) -> Result<serde_json::Value> {
        let target = build_endpoint(&self.settings.api, endpoint, query);
        debug!(
            "Calling {} ({})",
            endpoint.name(),
            endpoint.path(&self.settings.api)
        );

        match form {
            Some(form) => self.transport.post(&target, form).await,
            None => self.transport.get(&target).await,
        }
    }
}
