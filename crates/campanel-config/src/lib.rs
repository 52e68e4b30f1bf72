//! Configuration for the campanel TUI.
//!
//! A TOML file in the platform config directory, layered under
//! `CAMPANEL_`-prefixed environment variables, validated and translated to
//! `campanel_api::TransportConfig`. Command-line flags are applied on top by
//! the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use campanel_api::TransportConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Appliance base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds. Unset leaves the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: None,
            insecure: false,
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8000".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartTab {
    #[default]
    Camera,
    Wifi,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub start_tab: StartTab,

    /// Event-loop tick in milliseconds (spinner speed, toast expiry).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_tab: StartTab::default(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_tick_ms() -> u64 {
    250
}

const TICK_RANGE_MS: std::ops::RangeInclusive<u64> = 16..=5_000;

impl Config {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device_url()?;
        if self.device.timeout_secs == Some(0) {
            return Err(invalid("device.timeout_secs", "must be at least 1"));
        }
        if !TICK_RANGE_MS.contains(&self.ui.tick_ms) {
            return Err(invalid(
                "ui.tick_ms",
                format!(
                    "must be between {} and {}, got {}",
                    TICK_RANGE_MS.start(),
                    TICK_RANGE_MS.end(),
                    self.ui.tick_ms
                ),
            ));
        }
        Ok(())
    }

    /// The appliance URL, parsed. Only `http` and `https` are accepted.
    pub fn device_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self
            .device
            .url
            .parse()
            .map_err(|e| invalid("device.url", format!("'{}': {e}", self.device.url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(
                "device.url",
                format!("expected http or https, got '{other}'"),
            )),
        }
    }

    /// Transport settings for `campanel_api::DeviceClient`.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.device.timeout_secs.map(Duration::from_secs),
            accept_invalid_certs: self.device.insecure,
            ..TransportConfig::default()
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "campanel", "campanel").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("campanel");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CAMPANEL_").split("__"))
}

/// Load and validate config from `path` + environment. A missing file is
/// not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.device.url, "http://127.0.0.1:8000");
        assert_eq!(cfg.ui.tick_ms, 250);
        assert_eq!(cfg.ui.start_tab, StartTab::Camera);
        assert!(cfg.transport().timeout.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
            [device]
            url = "http://192.168.4.1:8000"
            timeout_secs = 5

            [ui]
            start_tab = "wifi"
            "#,
        );
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.device_url().unwrap().host_str(), Some("192.168.4.1"));
        assert_eq!(cfg.transport().timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.ui.start_tab, StartTab::Wifi);
        assert_eq!(cfg.ui.tick_ms, 250);
    }

    #[test]
    fn rejects_unusable_values() {
        let dir = tempfile::tempdir().unwrap();

        let path = write(&dir, "[device]\nurl = \"ftp://device\"\n");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { ref field, .. }) if field == "device.url"
        ));

        let path = write(&dir, "[device]\ntimeout_secs = 0\n");
        assert!(load_config_from(&path).is_err());

        let path = write(&dir, "[ui]\ntick_ms = 1\n");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { ref field, .. }) if field == "ui.tick_ms"
        ));
    }

    #[test]
    fn unknown_tab_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[ui]\nstart_tab = \"ethernet\"\n");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn insecure_device_accepts_invalid_certs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[device]\nurl = \"https://cam.local\"\ninsecure = true\n");

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.device.url, "https://cam.local");
        assert!(loaded.transport().accept_invalid_certs);
    }
}
