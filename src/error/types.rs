//! Error types for the Hola client
//!
//! Internal layers (transport, endpoint construction, payload parsing) report
//! failures through [`Error`]. The public client operations absorb them into
//! `false` / `None` after logging.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failures other than certificate verification
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
        /// Whether the request already went through the fallback root store
        fallback_attempted: bool,
    },

    /// TLS certificate verification failures
    #[error("Certificate error: {message}")]
    Certificate {
        /// Error message describing the certificate issue
        message: String,
    },

    /// Non-200 responses
    #[error("Unexpected HTTP status {status} from {endpoint}")]
    Status {
        /// Endpoint path that was requested
        endpoint: String,
        /// Status code returned by the service
        status: u16,
    },

    /// Session validation or issuance failures
    #[error("Session error during {stage}: {reason}")]
    Session {
        /// `validate` or `init`
        stage: String,
        /// Why the session could not be established
        reason: String,
    },

    /// Tunnel response lacked a required field or a usable host:port entry
    #[error("Malformed tunnel response for '{country}': {reason}")]
    MalformedTunnel {
        /// Country code the tunnel was requested for
        country: String,
        /// What was missing or unusable
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            fallback_attempted: false,
        }
    }

    /// Create a certificate error
    pub fn certificate<S: Into<String>>(message: S) -> Self {
        Self::Certificate {
            message: message.into(),
        }
    }

    /// Create a status error
    pub fn status<S: Into<String>>(endpoint: S, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Create a session error
    pub fn session<S: Into<String>>(stage: S, reason: S) -> Self {
        Self::Session {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed tunnel error
    pub fn malformed_tunnel<S: Into<String>>(country: S, reason: S) -> Self {
        Self::MalformedTunnel {
            country: country.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify a reqwest failure as certificate or plain network error
    pub fn from_request(err: reqwest::Error) -> Self {
        if is_certificate_failure(&err) {
            Self::certificate(describe_chain(&err))
        } else {
            Self::network(describe_chain(&err))
        }
    }

    /// Whether this failure belongs to the certificate-problem class
    pub fn is_certificate_error(&self) -> bool {
        match self {
            Error::Certificate { .. } => true,
            Error::Http(e) => is_certificate_failure(e),
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Network { .. } => "network",
            Error::Certificate { .. } => "certificate",
            Error::Status { .. } => "status",
            Error::Session { .. } => "session",
            Error::MalformedTunnel { .. } => "malformed_tunnel",
            Error::Config { .. } => "config",
            Error::Internal { .. } => "internal",
        }
    }
}

/// Walk the source chain looking for a rustls certificate rejection.
///
/// rustls errors reach us wrapped in an `io::Error`, whose `source()` skips the
/// wrapped value, so the inner error is inspected through `get_ref()` as well.
fn is_certificate_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(tls) = e.downcast_ref::<rustls::Error>()
            && is_certificate_rejection(tls)
        {
            return true;
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>()
            && let Some(inner) = io.get_ref()
            && let Some(tls) = inner.downcast_ref::<rustls::Error>()
            && is_certificate_rejection(tls)
        {
            return true;
        }
        if e.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}

fn is_certificate_rejection(err: &rustls::Error) -> bool {
    matches!(
        err,
        rustls::Error::InvalidCertificate(_) | rustls::Error::NoCertificatesPresented
    )
}

fn describe_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message = format!("{}: {}", message, cause_text);
        }
        source = cause.source();
    }
    message
}
