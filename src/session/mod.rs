//! Session management and tunnel lookup
//!
//! This module holds the session client and its collaborators: the HTTP
//! transport, endpoint construction, device id generation and tunnel
//! payload parsing.

pub mod client;
pub mod device;
pub mod endpoints;
pub mod network;
pub mod tunnel;

pub use client::{HolaClient, HolaClientGeneric};
pub use device::{generate_device_id, is_device_id};
pub use endpoints::{Endpoint, build_endpoint};
pub use network::{HttpTransport, Transport, TrustStore, retry_on_certificate_error};
pub use tunnel::{extract_host_port, parse_tunnel_response};
