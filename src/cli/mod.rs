//! Command-line front end
//!
//! Shared setup for the `session` and `tunnel` commands: configuration
//! loading, logging initialisation and credential handling.

pub mod session;
pub mod tunnel;

use crate::{
    Session, Settings,
    config::{ConfigLoader, LoggingSettings},
    utils::get_version,
};
use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct CommonArgs {
    pub config: Option<String>,
    pub uuid: Option<String>,
    pub session_key: Option<String>,
    pub verbose: bool,
}

impl CommonArgs {
    /// Stored credentials passed on the command line, if both are given
    pub fn credentials(&self) -> Option<Session> {
        match (&self.uuid, &self.session_key) {
            (Some(uuid), Some(key)) => Session::new(uuid.as_str(), key.as_str()),
            _ => None,
        }
    }
}

/// Load settings from `--config`, HOLA_CONFIG or the default location,
/// then apply environment overrides and CLI flags.
pub fn load_settings(args: &CommonArgs) -> Result<Settings> {
    let config_path = ConfigLoader::resolve_path(args.config.as_deref().map(std::path::Path::new));

    let mut settings = ConfigLoader::new()
        .load(config_path.as_deref())
        .context("Failed to load configuration")?;

    if args.verbose {
        settings.logging.verbose = true;
    }

    Ok(settings)
}

/// Build the log filter for `logging`.
///
/// Precedence: verbose (`--verbose` or `VERBOSE`) forces debug, then
/// `RUST_LOG`, then the configured level (`LOG_LEVEL` or `[logging] level`).
pub fn logging_filter(logging: &LoggingSettings) -> EnvFilter {
    if logging.verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&logging.level)
    }
}

/// Install stderr logging; stdout stays reserved for command output
pub fn init_logging(logging: &LoggingSettings) {
    let _ = tracing_subscriber::registry()
        .with(logging_filter(logging))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    tracing::debug!("hola-tunnel v{}", get_version());
}
