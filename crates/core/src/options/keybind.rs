//! Keybind registry
//!
//! Keybinds map a key name to a callback. Each bind has a default key and an
//! optional user override; the effective key is the override if set. Key
//! presses captured off the main thread are queued with
//! [`KeybindRegistry::queue_key_press`] and handled on the next frame.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use hookwork_sdk::InputEvent;

use super::OptionError;
use crate::tasks::{self, TaskError};

new_key_type! {
    /// Key for a registered keybind
    pub struct KeybindKey;
}

/// Keybind callback type
pub type KeybindCallback = Arc<dyn Fn() + Send + Sync>;

/// A registered keybind
#[derive(Clone)]
pub struct Keybind {
    pub name: String,
    /// User override
    pub key: Option<String>,
    pub default_key: Option<String>,
    pub enabled: bool,
    callback: KeybindCallback,
}

impl Keybind {
    /// The override if set, else the default
    pub fn effective_key(&self) -> Option<&str> {
        self.key.as_deref().or(self.default_key.as_deref())
    }
}

impl std::fmt::Debug for Keybind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keybind")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("default_key", &self.default_key)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// All keybinds of the process
#[derive(Default)]
pub struct KeybindRegistry {
    binds: RwLock<SlotMap<KeybindKey, Keybind>>,
}

static KEYBINDS: LazyLock<Arc<KeybindRegistry>> = LazyLock::new(|| Arc::new(KeybindRegistry::new()));

/// The process-wide keybind registry
pub fn keybinds() -> &'static Arc<KeybindRegistry> {
    &KEYBINDS
}

impl KeybindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enabled keybind
    pub fn register_keybind<F>(&self, name: &str, default_key: Option<&str>, callback: F) -> KeybindKey
    where
        F: Fn() + Send + Sync + 'static,
    {
        tracing::debug!("Registering keybind '{}' ({:?})", name, default_key);
        self.binds.write().insert(Keybind {
            name: name.to_string(),
            key: None,
            default_key: default_key.map(str::to_string),
            enabled: true,
            callback: Arc::new(callback),
        })
    }

    /// Override the key of a bind. `None` falls back to the default key.
    pub fn rebind(&self, key: KeybindKey, new_key: Option<&str>) -> Result<(), OptionError> {
        let mut binds = self.binds.write();
        let bind = binds.get_mut(key).ok_or(OptionError::UnknownKeybind)?;
        tracing::debug!("Rebinding '{}' to {:?}", bind.name, new_key);
        bind.key = new_key.map(str::to_string);
        Ok(())
    }

    pub fn effective_key(&self, key: KeybindKey) -> Option<String> {
        self.binds
            .read()
            .get(key)
            .and_then(|bind| bind.effective_key().map(str::to_string))
    }

    pub fn get(&self, key: KeybindKey) -> Option<Keybind> {
        self.binds.read().get(key).cloned()
    }

    fn set_enabled(&self, key: KeybindKey, enabled: bool) -> Result<(), OptionError> {
        let mut binds = self.binds.write();
        let bind = binds.get_mut(key).ok_or(OptionError::UnknownKeybind)?;
        bind.enabled = enabled;
        Ok(())
    }

    pub fn enable(&self, key: KeybindKey) -> Result<(), OptionError> {
        self.set_enabled(key, true)
    }

    pub fn disable(&self, key: KeybindKey) -> Result<(), OptionError> {
        self.set_enabled(key, false)
    }

    pub fn is_enabled(&self, key: KeybindKey) -> bool {
        self.binds.read().get(key).is_some_and(|bind| bind.enabled)
    }

    pub fn remove(&self, key: KeybindKey) -> bool {
        self.binds.write().remove(key).is_some()
    }

    /// Run every enabled bind on `key_name`. Only fresh presses count;
    /// repeats and releases are ignored. Returns the number of binds fired.
    pub fn dispatch_key_press(&self, key_name: &str, event: InputEvent) -> usize {
        if event != InputEvent::Pressed {
            return 0;
        }

        let callbacks: Vec<KeybindCallback> = self
            .binds
            .read()
            .values()
            .filter(|bind| bind.enabled && bind.effective_key() == Some(key_name))
            .map(|bind| Arc::clone(&bind.callback))
            .collect();

        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Handle a key press on the next frame. Safe to call from any thread.
    pub fn queue_key_press(self: &Arc<Self>, key_name: &str, event: InputEvent) -> Result<(), TaskError> {
        let registry = Arc::clone(self);
        let key_name = key_name.to_string();
        tasks::queue_task(move || {
            registry.dispatch_key_press(&key_name, event);
        })
    }
}
