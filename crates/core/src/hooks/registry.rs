//! Hook registry
//!
//! Maps a target identity to its registrations in registration order. Each
//! registration carries a phase, an enabled flag and the callback. Keys are
//! `slotmap` keys so a stale key can never alias a newer registration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use super::context::{CallContext, Decision};
use hookwork_engine::EngineError;

new_key_type! {
    /// Key for a registered hook
    pub struct HookKey;
}

/// Hook registry errors
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// No original function is installed for the target
    #[error("No original installed for target: {0}")]
    NotInstalled(String),

    /// The hook key does not name a live registration
    #[error("Hook not found")]
    NotFound,

    /// The original function failed inside the engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// When a hook runs relative to the original function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the original; may block it
    Before,
    /// After the original (or after a block); decision ignored
    AfterUnconditional,
}

/// Hook callback type
pub type HookCallback = Arc<dyn Fn(&mut CallContext<'_>) -> Decision + Send + Sync>;

/// Identity of an engine function, e.g. `"WillowGame.WillowPlayerController:NextWeapon"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TargetId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&TargetId> for TargetId {
    fn from(target: &TargetId) -> Self {
        target.clone()
    }
}

/// What makes two registrations "the same hook"
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identity {
    Named(String),
    /// Address of the callback's data
    Callback(usize),
}

/// A single hook registration
pub struct Registration {
    pub target: TargetId,
    pub phase: Phase,
    pub name: String,
    pub enabled: bool,
    identity: Identity,
    callback: HookCallback,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

fn callback_address(callback: &HookCallback) -> usize {
    Arc::as_ptr(callback) as *const () as usize
}

/// Target → ordered registrations
#[derive(Default)]
pub struct HookRegistry {
    entries: SlotMap<HookKey, Registration>,
    by_target: HashMap<TargetId, Vec<HookKey>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anonymous hook. Identity is the callback itself, so
    /// registering the same `Arc` twice yields the same key.
    pub fn register(&mut self, target: TargetId, phase: Phase, callback: HookCallback) -> HookKey {
        let identity = Identity::Callback(callback_address(&callback));
        let name = format!("anonymous@{:#x}", callback_address(&callback));
        self.insert(target, phase, name, identity, true, callback)
    }

    /// Register a hook identified by name
    pub fn register_named(
        &mut self,
        target: TargetId,
        phase: Phase,
        name: &str,
        enabled: bool,
        callback: HookCallback,
    ) -> HookKey {
        let identity = Identity::Named(name.to_string());
        self.insert(target, phase, name.to_string(), identity, enabled, callback)
    }

    fn insert(
        &mut self,
        target: TargetId,
        phase: Phase,
        name: String,
        identity: Identity,
        enabled: bool,
        callback: HookCallback,
    ) -> HookKey {
        if let Some(existing) = self.find(&target, phase, &identity) {
            tracing::debug!("Hook '{}' already registered on {} ({:?})", name, target, phase);
            return existing;
        }

        tracing::debug!(
            "Registering hook '{}' on {} ({:?}, enabled: {})",
            name,
            target,
            phase,
            enabled
        );

        let key = self.entries.insert(Registration {
            target: target.clone(),
            phase,
            name,
            enabled,
            identity,
            callback,
        });
        self.by_target.entry(target).or_default().push(key);
        key
    }

    fn find(&self, target: &TargetId, phase: Phase, identity: &Identity) -> Option<HookKey> {
        self.by_target.get(target)?.iter().copied().find(|key| {
            self.entries
                .get(*key)
                .is_some_and(|reg| reg.phase == phase && reg.identity == *identity)
        })
    }

    fn set_enabled(&mut self, key: HookKey, enabled: bool) -> Result<(), HookError> {
        let registration = self.entries.get_mut(key).ok_or(HookError::NotFound)?;
        if registration.enabled != enabled {
            tracing::debug!(
                "{} hook '{}' on {}",
                if enabled { "Enabling" } else { "Disabling" },
                registration.name,
                registration.target
            );
            registration.enabled = enabled;
        }
        Ok(())
    }

    pub fn enable(&mut self, key: HookKey) -> Result<(), HookError> {
        self.set_enabled(key, true)
    }

    pub fn disable(&mut self, key: HookKey) -> Result<(), HookError> {
        self.set_enabled(key, false)
    }

    /// Unknown keys report disabled
    pub fn is_enabled(&self, key: HookKey) -> bool {
        self.entries.get(key).is_some_and(|reg| reg.enabled)
    }

    /// Remove a registration
    pub fn remove(&mut self, key: HookKey) -> Result<(), HookError> {
        let registration = self.entries.remove(key).ok_or(HookError::NotFound)?;
        if let Some(keys) = self.by_target.get_mut(&registration.target) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.by_target.remove(&registration.target);
            }
        }
        tracing::debug!("Removed hook '{}' from {}", registration.name, registration.target);
        Ok(())
    }

    /// Enabled registrations for `target` in `phase`, in registration order
    pub fn lookup(&self, target: &TargetId, phase: Phase) -> Vec<(HookKey, HookCallback)> {
        let Some(keys) = self.by_target.get(target) else {
            return Vec::new();
        };

        keys.iter()
            .filter_map(|key| {
                let reg = self.entries.get(*key)?;
                (reg.enabled && reg.phase == phase).then(|| (*key, Arc::clone(&reg.callback)))
            })
            .collect()
    }

    pub fn get(&self, key: HookKey) -> Option<&Registration> {
        self.entries.get(key)
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
