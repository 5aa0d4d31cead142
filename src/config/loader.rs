//! Locating and layering the configuration
//!
//! Settings are built from three layers, later ones winning: built-in
//! defaults, a TOML file, then `HOLA_*` / proxy / logging environment
//! variables. The result is validated once and never changes afterwards.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the directory under the platform config dir
const APP_DIR: &str = "hola-tunnel";

/// Builds validated [`Settings`] from defaults, file and environment
#[derive(Debug)]
pub struct ConfigLoader {
    defaults: Settings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Config file to read when none is given explicitly.
    ///
    /// `HOLA_CONFIG` if it names an existing file, else
    /// `<config dir>/hola-tunnel/config.toml` if present.
    pub fn get_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var("HOLA_CONFIG") {
            let path = PathBuf::from(config_path);
            if path.exists() {
                debug!("Config file from HOLA_CONFIG: {:?}", path);
                return Some(path);
            }
            warn!("HOLA_CONFIG names a missing file, ignoring it: {:?}", path);
        }

        let default_path = dirs::config_dir()?.join(APP_DIR).join("config.toml");
        if default_path.exists() {
            debug!("Config file at default location: {:?}", default_path);
            Some(default_path)
        } else {
            debug!("No config file, using defaults and environment");
            None
        }
    }

    /// `explicit` when given (a `--config` flag), otherwise [`Self::get_config_path`]
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::get_config_path(),
        }
    }

    /// Layer `config_file` (if it exists) and the environment over the
    /// defaults, then validate.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let settings = match config_file {
            Some(path) if path.exists() => {
                info!("Reading configuration from {:?}", path);
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("Config file {:?} not found, using defaults", path);
                self.defaults.clone()
            }
            None => self.defaults.clone(),
        };

        let settings = settings.apply_env()?;
        settings.validate()?;

        debug!(
            "Configuration ready: api {} (ext {}), timeouts {}s/{}s",
            settings.api.base_url,
            settings.api.extension_version,
            settings.network.connect_timeout,
            settings.network.request_timeout
        );
        Ok(settings)
    }

    /// Defaults plus environment, ignoring any config file
    pub fn from_env_only(&self) -> Result<Settings> {
        let settings = Settings::from_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Built-in defaults
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
