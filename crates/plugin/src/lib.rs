//! hookwork Plugin - Mods and the C ABI Layer
//!
//! This crate ties the core building blocks into the two shipped mods and
//! exposes the plugin to its host. It compiles to a cdylib (.so/.dll) and an
//! rlib for hosts embedding it directly.
//!
//! - [`sell`] - Cleaning Up Pandora+ (sell from the ground or backpack)
//! - [`autosave`] - AutoSave Blocker
//! - [`ffi`] - `extern "C"` entry points
//!
//! The host installs its services with [`hookwork_engine::init_host`] and
//! the original engine functions with [`install_original`] before calling
//! [`load`]. Intercepted engine calls are then routed through [`dispatch`].

use std::sync::Arc;

use parking_lot::Mutex;

use hookwork_core::config::PluginConfig;
use hookwork_core::engine::{EngineError, HostServices, ObjectHandle, Value};
use hookwork_core::hooks::{Arguments, Dispatcher, HookError, Invocation};
use hookwork_core::{CoreConfig, KeybindRegistry, Mod, ModError};

pub mod autosave;
pub mod config;
pub mod ffi;
pub mod sell;
pub mod targets;
pub mod views;

pub use config::{AutosaveConfig, SellConfig, TextSettings};
pub use targets::Target;

/// Plugin errors
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin already loaded")]
    AlreadyLoaded,

    #[error("Plugin not loaded")]
    NotLoaded,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Mod(#[from] ModError),
}

/// Both mods and their shared state
pub struct Plugin {
    pub sell: Mod,
    pub sell_state: Arc<sell::SellState>,
    pub autosave: Mod,
    pub autosave_state: Arc<autosave::AutosaveState>,
}

impl Plugin {
    /// Register every mod's hooks and keybinds. Mods start disabled.
    pub fn build(
        services: Arc<HostServices>,
        dispatcher: Arc<Dispatcher>,
        keybinds: Arc<KeybindRegistry>,
        sell_config: SellConfig,
        autosave_config: AutosaveConfig,
    ) -> Result<Self, ModError> {
        let (sell, sell_state) = sell::build(
            Arc::clone(&services),
            Arc::clone(&dispatcher),
            Arc::clone(&keybinds),
            sell_config,
        )?;
        let (autosave, autosave_state) =
            autosave::build(services, dispatcher, keybinds, autosave_config)?;

        Ok(Self {
            sell,
            sell_state,
            autosave,
            autosave_state,
        })
    }

    pub fn mods(&self) -> [&Mod; 2] {
        [&self.sell, &self.autosave]
    }

    /// Enable the mods the core config does not disable
    pub fn apply(&self, core: &CoreConfig) -> Result<(), ModError> {
        for module in self.mods() {
            if core.is_mod_enabled(module.name()) {
                module.enable()?;
            } else {
                module.disable()?;
            }
        }
        Ok(())
    }

    pub fn unload(self) -> Result<(), ModError> {
        self.sell.unload()?;
        self.autosave.unload()
    }
}

static PLUGIN: Mutex<Option<Plugin>> = Mutex::new(None);

fn load_config<T: PluginConfig>() -> T {
    T::load().unwrap_or_else(|e| {
        tracing::warn!("Using default {} config: {}", T::PLUGIN_NAME, e);
        T::default()
    })
}

/// Build the mods against the global host, dispatcher and keybinds
#[tracing::instrument(skip_all)]
pub fn load(core: &CoreConfig) -> Result<(), PluginError> {
    let mut slot = PLUGIN.lock();
    if slot.is_some() {
        return Err(PluginError::AlreadyLoaded);
    }

    let plugin = Plugin::build(
        hookwork_engine::host()?,
        Arc::clone(hookwork_core::dispatcher()),
        Arc::clone(hookwork_core::keybinds()),
        load_config(),
        load_config(),
    )?;
    plugin.apply(core)?;

    tracing::info!("hookwork loaded ({} mods)", plugin.mods().len());
    *slot = Some(plugin);
    Ok(())
}

#[tracing::instrument(skip_all)]
pub fn unload() -> Result<(), PluginError> {
    let plugin = PLUGIN.lock().take().ok_or(PluginError::NotLoaded)?;
    plugin.unload()?;
    hookwork_core::shutdown();
    Ok(())
}

pub fn is_loaded() -> bool {
    PLUGIN.lock().is_some()
}

/// Route an intercepted engine call through its hooks
pub fn dispatch(
    target: Target,
    receiver: Option<ObjectHandle>,
    args: Arguments,
) -> Result<Value, HookError> {
    hookwork_core::dispatcher().dispatch(target, receiver, args)
}

/// Install the engine's own implementation of a target
pub fn install_original<F>(target: Target, original: F)
where
    F: Fn(&Invocation) -> Result<Value, EngineError> + Send + Sync + 'static,
{
    hookwork_core::dispatcher().install(target, original);
}
