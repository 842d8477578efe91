//! Mod lifecycle
//!
//! A mod is a named bundle of hooks and keybinds that is switched on and off
//! as a unit. Hooks added with [`ModBuilder::hook`] follow the mod's state.
//! Transient hooks (markup mediators, overlays gated by an option) are only
//! ever switched off by the mod; turning them on is left to the mod's own
//! logic.
//!
//! # Example
//!
//! ```ignore
//! let sell = ModBuilder::new("Cleaning Up Pandora+", dispatcher, keybinds)
//!     .hook(prompt_key)
//!     .mediation(tooltip_keys)
//!     .keybind(sell_bind)
//!     .build()?;
//!
//! sell.enable()?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::hooks::{Dispatcher, HookError, HookKey, MediationKeys};
use crate::options::{KeybindKey, KeybindRegistry, OptionError};

/// Mod lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum ModError {
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Keybind error: {0}")]
    Keybind(#[from] OptionError),
}

/// Lifecycle callback type
pub type LifecycleFn = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy)]
struct ModHook {
    key: HookKey,
    /// Enabled together with the mod
    auto: bool,
}

/// Builder for [`Mod`]
pub struct ModBuilder {
    name: String,
    description: String,
    dispatcher: Arc<Dispatcher>,
    keybinds: Arc<KeybindRegistry>,
    hooks: Vec<ModHook>,
    binds: Vec<KeybindKey>,
    on_enable: Vec<LifecycleFn>,
    on_disable: Vec<LifecycleFn>,
}

impl ModBuilder {
    pub fn new(
        name: impl Into<String>,
        dispatcher: Arc<Dispatcher>,
        keybinds: Arc<KeybindRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            dispatcher,
            keybinds,
            hooks: Vec::new(),
            binds: Vec::new(),
            on_enable: Vec::new(),
            on_disable: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Hook that is enabled and disabled with the mod
    pub fn hook(mut self, key: HookKey) -> Self {
        self.hooks.push(ModHook { key, auto: true });
        self
    }

    pub fn hooks(mut self, keys: impl IntoIterator<Item = HookKey>) -> Self {
        self.hooks
            .extend(keys.into_iter().map(|key| ModHook { key, auto: true }));
        self
    }

    /// Hook the mod only ever disables
    pub fn transient_hook(mut self, key: HookKey) -> Self {
        self.hooks.push(ModHook { key, auto: false });
        self
    }

    /// Producer and terminator follow the mod; the mediator stays transient
    pub fn mediation(self, keys: MediationKeys) -> Self {
        self.hooks(keys.persistent()).transient_hook(keys.mediator)
    }

    pub fn keybind(mut self, key: KeybindKey) -> Self {
        self.binds.push(key);
        self
    }

    pub fn on_enable<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_enable.push(Box::new(f));
        self
    }

    pub fn on_disable<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_disable.push(Box::new(f));
        self
    }

    /// Build the mod. Everything it owns starts disabled.
    pub fn build(self) -> Result<Mod, ModError> {
        for hook in &self.hooks {
            self.dispatcher.disable(hook.key)?;
        }
        for bind in &self.binds {
            self.keybinds.disable(*bind)?;
        }

        tracing::debug!(
            "Built mod '{}' ({} hooks, {} keybinds)",
            self.name,
            self.hooks.len(),
            self.binds.len()
        );

        Ok(Mod {
            name: self.name,
            description: self.description,
            dispatcher: self.dispatcher,
            keybinds: self.keybinds,
            hooks: self.hooks,
            binds: self.binds,
            on_enable: self.on_enable,
            on_disable: self.on_disable,
            enabled: AtomicBool::new(false),
        })
    }
}

/// A bundle of hooks and keybinds switched as a unit
pub struct Mod {
    name: String,
    description: String,
    dispatcher: Arc<Dispatcher>,
    keybinds: Arc<KeybindRegistry>,
    hooks: Vec<ModHook>,
    binds: Vec<KeybindKey>,
    on_enable: Vec<LifecycleFn>,
    on_disable: Vec<LifecycleFn>,
    enabled: AtomicBool,
}

impl Mod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Enable auto hooks and keybinds, then run the enable callbacks
    pub fn enable(&self) -> Result<(), ModError> {
        if self.enabled.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        for hook in self.hooks.iter().filter(|h| h.auto) {
            self.dispatcher.enable(hook.key)?;
        }
        for bind in &self.binds {
            self.keybinds.enable(*bind)?;
        }
        for callback in &self.on_enable {
            callback();
        }

        tracing::info!("Enabled mod '{}'", self.name);
        Ok(())
    }

    /// Disable every hook and keybind, then run the disable callbacks
    pub fn disable(&self) -> Result<(), ModError> {
        if !self.enabled.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        for hook in &self.hooks {
            self.dispatcher.disable(hook.key)?;
        }
        for bind in &self.binds {
            self.keybinds.disable(*bind)?;
        }
        for callback in &self.on_disable {
            callback();
        }

        tracing::info!("Disabled mod '{}'", self.name);
        Ok(())
    }

    /// Disable and drop every registration the mod owns
    pub fn unload(self) -> Result<(), ModError> {
        self.disable()?;
        for hook in &self.hooks {
            self.dispatcher.remove(hook.key)?;
        }
        for bind in &self.binds {
            self.keybinds.remove(*bind);
        }
        tracing::debug!("Unloaded mod '{}'", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{Decision, MarkupMediation, Phase};
    use std::sync::atomic::AtomicUsize;

    fn setup() -> (Arc<Dispatcher>, Arc<KeybindRegistry>) {
        (Arc::new(Dispatcher::new()), Arc::new(KeybindRegistry::new()))
    }

    #[test]
    fn test_mod_starts_disabled() {
        let (dispatcher, keybinds) = setup();
        let hook = dispatcher.register("A.B:C", Phase::Before, |_| Decision::Continue);
        let bind = keybinds.register_keybind("Toggle", Some("F2"), || {});

        let m = ModBuilder::new("Test", Arc::clone(&dispatcher), Arc::clone(&keybinds))
            .hook(hook)
            .keybind(bind)
            .build()
            .unwrap();

        assert!(!m.is_enabled());
        assert!(!dispatcher.is_enabled(hook));
        assert!(!keybinds.is_enabled(bind));

        m.enable().unwrap();
        assert!(dispatcher.is_enabled(hook));
        assert!(keybinds.is_enabled(bind));

        m.disable().unwrap();
        assert!(!dispatcher.is_enabled(hook));
        assert!(!keybinds.is_enabled(bind));
    }

    #[test]
    fn test_transient_hooks_only_disabled() {
        let (dispatcher, keybinds) = setup();
        let keys = MarkupMediation::new("tooltip", "A.B:Tooltip", "A.B:Markup")
            .install(&dispatcher, |_| None);

        let m = ModBuilder::new("Test", Arc::clone(&dispatcher), keybinds)
            .mediation(keys)
            .build()
            .unwrap();

        m.enable().unwrap();
        assert!(dispatcher.is_enabled(keys.producer));
        assert!(dispatcher.is_enabled(keys.terminator));
        assert!(!dispatcher.is_enabled(keys.mediator));

        dispatcher.enable(keys.mediator).unwrap();
        m.disable().unwrap();
        assert!(keys.all().iter().all(|k| !dispatcher.is_enabled(*k)));
    }

    #[test]
    fn test_lifecycle_callbacks_run_once_per_transition() {
        let (dispatcher, keybinds) = setup();
        let enables = Arc::new(AtomicUsize::new(0));
        let disables = Arc::new(AtomicUsize::new(0));

        let (e, d) = (Arc::clone(&enables), Arc::clone(&disables));
        let m = ModBuilder::new("Test", dispatcher, keybinds)
            .on_enable(move || {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .on_disable(move || {
                d.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        m.enable().unwrap();
        m.enable().unwrap();
        m.disable().unwrap();
        m.disable().unwrap();

        assert_eq!(enables.load(Ordering::SeqCst), 1);
        assert_eq!(disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unload_removes_registrations() {
        let (dispatcher, keybinds) = setup();
        let hook = dispatcher.register("A.B:C", Phase::Before, |_| Decision::Continue);

        let m = ModBuilder::new("Test", Arc::clone(&dispatcher), keybinds)
            .hook(hook)
            .build()
            .unwrap();
        m.enable().unwrap();
        m.unload().unwrap();

        assert!(dispatcher.hook_name(hook).is_none());
    }
}
