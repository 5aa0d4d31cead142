//! `tunnel` command
//!
//! Establishes or reuses a session, requests a tunnel for one country and
//! prints it, either as JSON together with the session credentials or as a
//! proxy URL.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::{CommonArgs, init_logging, load_settings};
use crate::{HolaClient, Session, TunnelDescriptor};

/// Arguments for the tunnel command
#[derive(Debug)]
pub struct TunnelArgs {
    pub common: CommonArgs,
    /// Country code; the configured default when absent
    pub country: Option<String>,
    /// Print a proxy URL instead of JSON
    pub url: bool,
    /// Scheme used for `--url`
    pub scheme: String,
}

/// JSON document printed on success
#[derive(Debug, Serialize)]
pub struct TunnelOutput<'a> {
    pub country: String,
    pub session: &'a Session,
    pub tunnel: &'a TunnelDescriptor,
}

/// Run the tunnel command
pub async fn run_tunnel_mode(args: TunnelArgs) -> Result<()> {
    let settings = load_settings(&args.common)?;
    init_logging(&settings.logging);

    let country = args
        .country
        .clone()
        .unwrap_or_else(|| settings.api.default_country.clone())
        .to_lowercase();
    debug!("Requesting tunnel for country '{}'", country);

    let client = HolaClient::connect(settings, args.common.credentials()).await?;

    let Some(session) = client.get_session() else {
        fail("Failed to establish a session");
    };

    let Some(tunnel) = client.get_tunnels(&country).await else {
        fail(&format!("No tunnel available for '{}'", country));
    };

    if args.url {
        println!("{}", tunnel.proxy_url(&args.scheme)?);
    } else {
        let output = TunnelOutput {
            country,
            session,
            tunnel: &tunnel,
        };
        println!("{}", serde_json::to_string(&output)?);
    }

    Ok(())
}

/// Print the failure, an empty JSON object, and exit with status 1
fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    println!("{{}}");
    std::process::exit(1);
}
