//! Configuration system
//!
//! Mods describe their settings as serde structs stored as TOML:
//! - Type-safe config structs via serde
//! - Default file written on first load
//! - Manual save and reload
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use hookwork_core::PluginConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct SellConfig {
//!     pub sell_key: String,
//! }
//!
//! impl PluginConfig for SellConfig {
//!     const PLUGIN_NAME: &'static str = "sell";
//! }
//!
//! let config = SellConfig::load().unwrap_or_default();
//! ```

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{
    configs_dir, core_config_path, core_config_path_in, hookwork_base_dir, plugin_config_path,
    plugin_config_path_in, HOME_ENV,
};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine the base directory
    #[error("Config directory not available - set HOOKWORK_HOME or load from the plugin directory")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read a config, writing the default first if the file does not exist
pub fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let config = read_from(path)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        let default = T::default();
        write_to(&default, path)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

pub fn read_from<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Write a config, creating parent directories
pub fn write_to<T: Serialize>(config: &T, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

/// Trait for mod configuration types.
///
/// Configs are stored at
/// `<base>/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`.
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Name used for config file path resolution
    const PLUGIN_NAME: &'static str;

    /// Load config from file, creating default if missing
    fn load() -> ConfigResult<Self> {
        load_or_create(&plugin_config_path(Self::PLUGIN_NAME)?)
    }

    fn save(&self) -> ConfigResult<()> {
        write_to(self, &plugin_config_path(Self::PLUGIN_NAME)?)
    }

    /// Replace self with the current file contents
    fn reload(&mut self) -> ConfigResult<()> {
        *self = read_from(&plugin_config_path(Self::PLUGIN_NAME)?)?;
        tracing::debug!("Reloaded config for {}", Self::PLUGIN_NAME);
        Ok(())
    }

    /// Load from an explicit configs directory
    fn load_in(configs: &Path) -> ConfigResult<Self> {
        load_or_create(&plugin_config_path_in(configs, Self::PLUGIN_NAME))
    }
}

/// Framework-level settings, loaded from `<base>/configs/core.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Explicit `tracing` filter directive; overrides `debug`
    pub log_filter: Option<String>,

    /// Mods left disabled at load
    pub disabled_mods: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            log_filter: None,
            disabled_mods: Vec::new(),
        }
    }
}

impl CoreConfig {
    pub fn load() -> ConfigResult<Self> {
        load_or_create(&core_config_path()?)
    }

    pub fn save(&self) -> ConfigResult<()> {
        write_to(self, &core_config_path()?)
    }

    pub fn reload(&mut self) -> ConfigResult<()> {
        *self = read_from(&core_config_path()?)?;
        Ok(())
    }

    pub fn load_in(configs: &Path) -> ConfigResult<Self> {
        load_or_create(&core_config_path_in(configs))
    }

    /// Filter directive for the log subscriber
    pub fn log_directive(&self) -> String {
        match &self.log_filter {
            Some(filter) if !filter.trim().is_empty() => filter.clone(),
            _ if self.debug => "debug".to_string(),
            _ => "info".to_string(),
        }
    }

    pub fn is_mod_enabled(&self, name: &str) -> bool {
        !self.disabled_mods.iter().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct TestConfig {
        pub value: i32,
        pub name: String,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                value: 7,
                name: "default".to_string(),
            }
        }
    }

    impl PluginConfig for TestConfig {
        const PLUGIN_NAME: &'static str = "test_plugin";
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hookwork-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_load_creates_default() {
        let dir = scratch_dir("create");
        let config = TestConfig::load_in(&dir).unwrap();
        assert_eq!(config, TestConfig::default());

        let path = plugin_config_path_in(&dir, "test_plugin");
        assert!(path.exists());

        std::fs::write(&path, "value = 42\n").unwrap();
        let config = TestConfig::load_in(&dir).unwrap();
        assert_eq!(config.value, 42);
        // Missing keys fall back to defaults
        assert_eq!(config.name, "default");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = scratch_dir("invalid");
        let path = core_config_path_in(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "debug = [").unwrap();

        assert!(matches!(
            CoreConfig::load_in(&dir),
            Err(ConfigError::ParseError(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_log_directive() {
        let mut config = CoreConfig::default();
        assert_eq!(config.log_directive(), "info");

        config.debug = true;
        assert_eq!(config.log_directive(), "debug");

        config.log_filter = Some("hookwork=trace".to_string());
        assert_eq!(config.log_directive(), "hookwork=trace");
    }

    #[test]
    fn test_core_config_serialize() {
        let config = CoreConfig {
            version: 2,
            debug: true,
            disabled_mods: vec!["Auto Save Blocker".to_string()],
            ..CoreConfig::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 2"));
        assert!(toml_str.contains("debug = true"));

        let parsed: CoreConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
        assert!(!parsed.is_mod_enabled("Auto Save Blocker"));
        assert!(parsed.is_mod_enabled("Cleaning Up Pandora+"));
    }
}
