//! Type definitions for the Hola client
//!
//! This module contains the session and tunnel records handed to callers,
//! and the typed views over the service's JSON responses.

pub mod internal;
pub mod response;

pub use internal::{Session, TunnelDescriptor};
pub use response::{InitSessionResponse, TunnelsResponse};
