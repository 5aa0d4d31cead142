//! Hola Tunnel - client for the Hola proxy-brokering API
//!
//! Establishes a session with the Hola service (device id + session key),
//! validates or reuses existing sessions, and requests a proxy endpoint
//! ("tunnel") for a country code.
//!
//! # Features
//!
//! - **Session lifecycle**: create a fresh session or validate and reuse stored credentials
//! - **Tunnel lookup**: host, port, display IP and proxy credentials per country
//! - **Certificate fallback**: one retry against bundled root certificates when the
//!   platform trust store rejects the service's certificate
//! - **Substitutable transport**: the [`session::Transport`] trait lets tests inject canned responses
//!
//! # Architecture
//!
//! - [`session::network`]: HTTP transport (GET/POST, timeouts, headers, JSON decoding)
//! - [`session::client`]: session lifecycle and tunnel parsing on top of the transport
//!
//! Credentials are not persisted; store the pair returned by
//! [`HolaClientGeneric::get_session`] to reuse a session later.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hola_tunnel::{HolaClient, Session, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let stored = Session::new("0123456789abcdef0123456789abcdef", "1234567");
//! let client = HolaClient::connect(Settings::default(), stored).await?;
//! let tunnel = client.get_default_tunnels().await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use session::{HolaClient, HolaClientGeneric};
pub use types::{Session, TunnelDescriptor};
