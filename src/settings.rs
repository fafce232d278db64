//! Settings Management
//!
//! Loads the `settings.json` document that provides the API version and the
//! defaults applied to resources before insert/delete (zone, network, machine
//! type, image, firewall rules, access configs).

use crate::error::GceError;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "GCE_SETTINGS";

/// Settings file name searched in the working directory and config dir.
const SETTINGS_FILE: &str = "settings.json";

fn default_api_base() -> String {
    "https://www.googleapis.com/compute".to_string()
}

/// Top-level settings document.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Default project id, used when the caller supplies none.
    pub project: String,
    /// Base URL of the Compute Engine API endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Compute-specific defaults.
    pub compute: ComputeSettings,
}

/// Compute Engine defaults applied by `set_defaults`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeSettings {
    /// API version segment of resource URLs (e.g. `v1beta14`).
    pub api_version: String,
    /// Default zone for zonal resources.
    pub zone: String,
    /// Default network name.
    pub network: String,
    /// Default machine type name.
    pub machine_type: String,
    /// Default image name.
    pub image: String,
    /// Defaults for firewall rules.
    pub firewall: FirewallDefaults,
    /// Default access configs attached to a defaulted network interface.
    pub access_configs: Vec<Value>,
}

/// Default firewall rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct FirewallDefaults {
    /// IP ranges traffic is accepted from.
    #[serde(rename = "sourceRanges")]
    pub source_ranges: Vec<String>,
    /// Allowed IP protocols and open ports.
    pub allowed: Vec<Value>,
}

impl Settings {
    /// Load settings from a specific file.
    pub fn load(path: &Path) -> Result<Self, GceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GceError::Settings(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse a settings document. Missing required keys are fatal.
    pub fn parse(content: &str) -> Result<Self, GceError> {
        serde_json::from_str(content).map_err(|e| GceError::Settings(e.to_string()))
    }

    /// Load settings from the default location.
    ///
    /// Lookup order: `GCE_SETTINGS` env var, `settings.json` in the working
    /// directory, then `<config dir>/gce-client/settings.json`.
    pub fn load_default() -> Result<Self, GceError> {
        let path = Self::default_path()
            .ok_or_else(|| GceError::Settings("no settings.json found".to_string()))?;
        Self::load(&path)
    }

    fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(SETTINGS_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|p| p.join("gce-client").join(SETTINGS_FILE))
            .filter(|p| p.exists())
    }
}
