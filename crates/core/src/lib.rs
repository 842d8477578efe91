//! hookwork Core - Hook Dispatch and Mod Building Blocks
//!
//! This crate contains everything a mod needs between the host's raw
//! function interception and the mod's own logic:
//!
//! - [`hooks`] - registry, dispatcher, call-through guard, session slots and
//!   markup mediation
//! - [`buyback`] - bounded sale history
//! - [`sell`] - the sell transaction and its capability traits
//! - [`options`] - sliders, toggles and keybinds
//! - [`tasks`] / [`frame`] - main-thread task queue and its per-frame pump
//! - [`mods`] - switching hooks and keybinds as one unit
//! - [`config`] - TOML configs
//!
//! # Re-exports
//!
//! The SDK and engine crates are re-exported for convenience:
//! - [`sdk`] - engine vocabulary and target names
//! - [`engine`] - object model and host services

// Allow the crate to refer to itself as `hookwork_core` for proc macro compatibility
extern crate self as hookwork_core;

use tracing::info;

pub use hookwork_engine as engine;
pub use hookwork_sdk as sdk;

pub mod buyback;
pub mod config;
pub mod frame;
pub mod hooks;
pub mod mods;
pub mod options;
pub mod sell;
pub mod tasks;

// Re-export commonly used items
pub use buyback::{BuybackCache, DEFAULT_BUYBACK_CAPACITY};
pub use config::{ConfigError, ConfigResult, CoreConfig, PluginConfig};
pub use frame::{frame_count, on_frame};
pub use hooks::{
    concat_markup, dispatcher, Arguments, CallContext, Decision, Dispatcher, HookError, HookKey,
    MarkupMediation, MediationKeys, Phase, TargetId,
};
pub use mods::{Mod, ModBuilder, ModError};
pub use options::{
    keybinds, BoolOption, KeybindKey, KeybindRegistry, OptionError, OptionGroup, SliderOption,
};
pub use sell::{
    SaleError, SaleFeedback, SaleLedger, SalePolicy, SaleReceipt, SaleRejected, SaleSource,
    Sellable, SellTransaction,
};
pub use tasks::{queue_task, TaskError};

// Re-export macros
pub use hookwork_macros::{hook, ObjectView};

/// Shutdown hook for the FFI layer
pub fn shutdown() {
    info!("hookwork shutting down...");
}
