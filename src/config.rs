// Configuration file parser

//! Optional TOML configuration.
//!
//! A missing file means built-in defaults; a file that exists but fails
//! to parse or validate is fatal. Command-line flags always win over
//! file values. Constants that name contracts with the companion GUI
//! (tunnel interface, nftables tables, connection name) are deliberately
//! not configurable.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::exec::validate_interface_name;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/throne-hotspot/config.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// General options.
    pub general: GeneralConfig,
}

/// General configuration options.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default SSID when `--ssid` is not passed.
    pub ssid: Option<String>,
    /// Wi-Fi interface override when `--iface` is not passed.
    pub interface: Option<String>,
    /// env_logger filter applied when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            ssid: None,
            interface: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from `path`, or defaults when the file is absent.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<()> {
    if let Some(ssid) = &config.general.ssid {
        if ssid.is_empty() {
            anyhow::bail!("ssid cannot be empty");
        }
    }
    if let Some(interface) = &config.general.interface {
        validate_interface_name(interface).map_err(|err| anyhow::anyhow!("{err}"))?;
    }
    Ok(())
}
