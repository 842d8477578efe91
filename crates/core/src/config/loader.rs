//! Config path resolution
//!
//! Config files live under a base directory:
//!
//! - `$HOOKWORK_HOME` when set
//! - otherwise the directory two levels above the loaded plugin binary
//!   (`<base>/bin/<platform>/hookwork.dll` → `<base>`)

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "HOOKWORK_HOME";

/// Returns the hookwork base directory
pub fn hookwork_base_dir() -> ConfigResult<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    // Navigate: hookwork.dll -> <platform> -> bin -> <base>
    exe.parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// `<base>/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(hookwork_base_dir()?.join("configs"))
}

/// `<base>/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(plugin_name: &str) -> ConfigResult<PathBuf> {
    Ok(plugin_config_path_in(&configs_dir()?, plugin_name))
}

/// `<base>/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(core_config_path_in(&configs_dir()?))
}

pub fn plugin_config_path_in(configs: &Path, plugin_name: &str) -> PathBuf {
    configs
        .join("plugins")
        .join(plugin_name)
        .join(format!("{plugin_name}.toml"))
}

pub fn core_config_path_in(configs: &Path) -> PathBuf {
    configs.join("core.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_config_path_format() {
        let path = plugin_config_path_in(Path::new("/game/hookwork/configs"), "sell");
        assert_eq!(path, PathBuf::from("/game/hookwork/configs/plugins/sell/sell.toml"));
    }

    #[test]
    fn test_core_config_path_format() {
        let path = core_config_path_in(Path::new("/game/hookwork/configs"));
        assert!(path.ends_with("configs/core.toml"));
    }
}
