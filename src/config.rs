//! Configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub onepassword: OnePasswordConfig,
    #[serde(default)]
    pub hotkey: HotkeyConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            onepassword: OnePasswordConfig::default(),
            hotkey: HotkeyConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

/// 1Password-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnePasswordConfig {
    /// Title of the secure note that receives clipboard text
    #[serde(default = "default_item_title")]
    pub item_title: String,
    /// Path to the `op` binary (default: resolved from PATH)
    #[serde(default = "default_op_path")]
    pub op_path: String,
    /// Vault to read and write in (default: account default vault)
    #[serde(default)]
    pub vault: Option<String>,
    /// Seconds to wait for an `op` call before killing it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OnePasswordConfig {
    fn default() -> Self {
        Self {
            item_title: default_item_title(),
            op_path: default_op_path(),
            vault: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_item_title() -> String {
    "_CP".to_string()
}

fn default_op_path() -> String {
    "op".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Global hotkey configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key binding, e.g. "ctrl+alt+f12"
    #[serde(default = "default_binding")]
    pub binding: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            binding: default_binding(),
        }
    }
}

fn default_binding() -> String {
    "ctrl+alt+f12".to_string()
}

/// Desktop notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Show transient notifications after each save attempt
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    /// How long notifications stay visible, in milliseconds
    #[serde(default = "default_notification_timeout_ms")]
    pub timeout_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            timeout_ms: default_notification_timeout_ms(),
        }
    }
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_notification_timeout_ms() -> u32 {
    3000
}

impl Config {
    /// Load configuration from default location.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::from_file(&config_path.to_string_lossy())
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = std::fs::read_to_string(&expanded)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("clipvault")
            .join("config.toml")
    }

    /// Get the resolved path to the `op` binary.
    pub fn op_path(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.onepassword.op_path))
    }
}

/// Expand ~ to home directory.
fn expand_path(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.onepassword.item_title, "_CP");
        assert_eq!(config.onepassword.op_path, "op");
        assert_eq!(config.onepassword.timeout_secs, 30);
        assert!(config.onepassword.vault.is_none());
        assert_eq!(config.hotkey.binding, "ctrl+alt+f12");
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [onepassword]
            item_title = "scratch"
            vault = "Personal"
            "#,
        )
        .unwrap();

        assert_eq!(config.onepassword.item_title, "scratch");
        assert_eq!(config.onepassword.vault.as_deref(), Some("Personal"));
        assert_eq!(config.onepassword.timeout_secs, 30);
        assert_eq!(config.hotkey.binding, "ctrl+alt+f12");
        assert_eq!(config.notifications.timeout_ms, 3000);
    }
}
