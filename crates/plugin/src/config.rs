//! Mod configs
//!
//! Stored as TOML under `<base>/configs/plugins/<name>/<name>.toml` and
//! written with defaults on first load.

use serde::{Deserialize, Serialize};

use hookwork_core::sdk::input::{DEFAULT_AUTOSAVE_TOGGLE_KEY, DEFAULT_SELL_KEY};
use hookwork_core::{PluginConfig, DEFAULT_BUYBACK_CAPACITY};

/// Cleaning Up Pandora+ settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellConfig {
    /// Default key of the sell keybind
    pub sell_key: String,

    /// Number of sales kept for buyback
    pub buyback_capacity: usize,

    /// Title of HUD sale messages
    pub message_title: String,

    /// Seconds a sold pickup takes to shrink away
    pub shrink_duration: f64,

    /// Block weapon swaps while a gamepad user looks at a pickup
    pub block_swap_on_gamepad: bool,
}

impl Default for SellConfig {
    fn default() -> Self {
        Self {
            sell_key: DEFAULT_SELL_KEY.to_string(),
            buyback_capacity: DEFAULT_BUYBACK_CAPACITY,
            message_title: "Cleaning Up Pandora+".to_string(),
            shrink_duration: 0.5,
            block_swap_on_gamepad: true,
        }
    }
}

impl PluginConfig for SellConfig {
    const PLUGIN_NAME: &'static str = "sell";
}

/// Overlay text appearance. Position is in thousandths of the canvas width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    pub alpha: i64,
    pub x: i64,
    pub y: i64,
    /// Percent scale
    pub size: i64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            red: 255,
            green: 0,
            blue: 0,
            alpha: 215,
            x: 10,
            y: 20,
            size: 100,
        }
    }
}

/// AutoSave Blocker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub toggle_key: String,

    /// Draw the blocking state on screen
    pub show_text: bool,

    pub text: TextSettings,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            toggle_key: DEFAULT_AUTOSAVE_TOGGLE_KEY.to_string(),
            show_text: true,
            text: TextSettings::default(),
        }
    }
}

impl PluginConfig for AutosaveConfig {
    const PLUGIN_NAME: &'static str = "autosave";
}
