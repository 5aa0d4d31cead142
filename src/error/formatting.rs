//! Error formatting utilities
//!
//! Renders errors together with their `source()` chain, for log lines and
//! for the CLI's stderr output.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display, appending nested causes
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Network {
            message,
            fallback_attempted: true,
        } => format!("Network error (after certificate fallback): {}", message),

        Error::Status { endpoint, status } => {
            format!("{} answered with HTTP {}", endpoint, status)
        }

        Error::Session { stage, reason } => match stage.as_str() {
            "validate" => format!("Session credentials rejected: {}", reason),
            "init" => format!("Session could not be issued: {}", reason),
            _ => format!("Session error during {}: {}", stage, reason),
        },

        Error::MalformedTunnel { country, reason } => {
            format!("No usable tunnel for '{}': {}", country, reason)
        }

        // For everything else, use the Display implementation
        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "certificate": error.is_certificate_error(),
    });

    match error {
        Error::Status { status, endpoint } => {
            log_data["status"] = serde_json::Value::Number((*status).into());
            log_data["endpoint"] = serde_json::Value::String(endpoint.clone());
        }
        Error::MalformedTunnel { country, .. } => {
            log_data["country"] = serde_json::Value::String(country.clone());
        }
        Error::Network {
            fallback_attempted, ..
        } => {
            log_data["fallback_attempted"] = serde_json::Value::Bool(*fallback_attempted);
        }
        _ => {}
    }

    log_data
}
