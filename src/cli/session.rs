//! `session` command
//!
//! Establishes (or validates) a session and prints the credentials as JSON
//! so they can be stored and passed back with `--uuid` / `--session-key`.

use anyhow::Result;
use tracing::{debug, info};

use super::{CommonArgs, init_logging, load_settings};
use crate::HolaClient;

/// Arguments for the session command
#[derive(Debug)]
pub struct SessionArgs {
    pub common: CommonArgs,
}

/// Run the session command
pub async fn run_session_mode(args: SessionArgs) -> Result<()> {
    let settings = load_settings(&args.common)?;
    init_logging(&settings.logging);

    let credentials = args.common.credentials();
    debug!(
        "Establishing session (reusing stored credentials: {})",
        credentials.is_some()
    );

    let client = HolaClient::connect(settings, credentials).await?;

    match client.get_session() {
        Some(session) => {
            println!("{}", serde_json::to_string(session)?);
            info!("Session ready for device {}", session.device_id);
            Ok(())
        }
        None => {
            eprintln!("Failed to establish a session");
            println!("{{}}");
            std::process::exit(1);
        }
    }
}
