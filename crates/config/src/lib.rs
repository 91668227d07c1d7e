//! Configuration loading, validation, and management for Briefcast.
//!
//! Loads configuration from `~/.briefcast/config.toml` with environment
//! variable overrides. Validates all settings at startup, including every
//! templated briefing field.

use briefcast_core::{BriefingConfig, BriefingEntry, BriefingItem, FieldValue, TemplateRenderer};
use briefcast_template::TemplateEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.briefcast/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Flash briefings: the shared password plus one list of items per id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash_briefings: Option<FlashBriefingsConfig>,

    /// Variables exposed to templated briefing fields
    #[serde(default)]
    pub templates: TemplatesConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_public_bind: bool,

    /// Also serve `/api/alexa/flash_briefings/{id}` next to `/briefings/{id}`
    #[serde(default = "default_true")]
    pub legacy_alexa_route: bool,
}

fn default_port() -> u16 {
    8787
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_public_bind: false,
            legacy_alexa_route: true,
        }
    }
}

impl GatewayConfig {
    /// Whether `host` only accepts local connections.
    pub fn is_loopback(&self) -> bool {
        matches!(self.host.as_str(), "localhost" | "::1" | "[::1]") || self.host.starts_with("127.")
    }
}

/// The `[flash_briefings]` table.
///
/// `password` is the shared secret; every other key is a briefing id.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct FlashBriefingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(flatten)]
    pub briefings: BriefingConfig,
}

impl std::fmt::Debug for FlashBriefingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashBriefingsConfig")
            .field("password", &redact(&self.password))
            .field("briefings", &self.briefings)
            .finish()
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.briefcast/config.toml).
    ///
    /// Environment variables override file values:
    /// - `BRIEFCAST_PASSWORD`
    /// - `BRIEFCAST_HOST`
    /// - `BRIEFCAST_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Load from `path`, then apply environment overrides and validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse(&content).map_err(|reason| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse configuration from TOML text without validating it.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(password) = lookup("BRIEFCAST_PASSWORD") {
            self.flash_briefings
                .get_or_insert_with(FlashBriefingsConfig::default)
                .password = Some(password);
        }

        if let Some(host) = lookup("BRIEFCAST_HOST") {
            self.gateway.host = host;
        }

        if let Some(port) = lookup("BRIEFCAST_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("BRIEFCAST_PORT is not a valid port: {port}"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".briefcast")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gateway.allow_public_bind && !self.gateway.is_loopback() {
            return Err(ConfigError::ValidationError(format!(
                "gateway.host {} is not a loopback address; set gateway.allow_public_bind = true to expose it",
                self.gateway.host
            )));
        }

        let Some(flash) = &self.flash_briefings else {
            return Ok(());
        };

        match flash.password.as_deref() {
            None => {
                return Err(ConfigError::ValidationError(
                    "flash_briefings.password is required".into(),
                ));
            }
            Some("") => {
                return Err(ConfigError::ValidationError(
                    "flash_briefings.password must not be empty".into(),
                ));
            }
            Some(_) => {}
        }

        let engine = TemplateEngine::new();
        for (briefing_id, entry) in &flash.briefings {
            let Some(items) = entry.items() else {
                let reason = entry.malformed_reason().unwrap_or_default();
                tracing::warn!(
                    briefing_id = %briefing_id,
                    reason = %reason,
                    "Flash briefing is not a list of items and will answer 404"
                );
                continue;
            };
            for (index, item) in items.iter().enumerate() {
                for (field, source) in item.templates() {
                    engine.validate(source).map_err(|e| {
                        ConfigError::ValidationError(format!(
                            "flash_briefings.{briefing_id}[{index}].{field}: {e}"
                        ))
                    })?;
                }
            }
        }

        Ok(())
    }

    /// The configured briefings (empty when `[flash_briefings]` is absent).
    pub fn briefings(&self) -> BriefingConfig {
        self.flash_briefings
            .as_ref()
            .map(|f| f.briefings.clone())
            .unwrap_or_default()
    }

    /// The shared flash briefing password, if set.
    pub fn password(&self) -> Option<&str> {
        self.flash_briefings.as_ref()?.password.as_deref()
    }

    /// A starter configuration with one sample briefing.
    pub fn starter() -> Self {
        let mut briefings = BriefingConfig::new();
        briefings.insert(
            "morning".into(),
            BriefingEntry::Items(vec![BriefingItem {
                title: Some(FieldValue::from("Good morning")),
                text: Some(FieldValue::from(
                    "Today looks {{ forecast | default('uneventful') }}.",
                )),
                uid: None,
                audio: None,
                display_url: Some(FieldValue::from("https://example.com")),
            }]),
        );

        let mut variables = BTreeMap::new();
        variables.insert("forecast".into(), serde_json::Value::from("sunny"));

        Self {
            gateway: GatewayConfig::default(),
            flash_briefings: Some(FlashBriefingsConfig {
                password: Some("change-me".into()),
                briefings,
            }),
            templates: TemplatesConfig { variables },
        }
    }

    /// Serialize this configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Generate a starter config TOML string (for the `init` command).
    pub fn default_toml() -> Result<String, ConfigError> {
        Self::starter().to_toml()
    }

    /// Write the starter config to `path` unless a file already exists.
    ///
    /// Returns `false` when the file was left untouched.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let content = Self::default_toml()?;
        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;
        Ok(true)
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
