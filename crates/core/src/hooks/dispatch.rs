//! Dispatch coordinator
//!
//! Every intercepted engine call goes through [`Dispatcher::dispatch`]:
//!
//! 1. Enabled Before hooks run in registration order. The first
//!    [`Decision::Block`] fixes the result and stops the Before phase.
//! 2. If nothing blocked, the original runs once (or its result is reused
//!    when a Before hook already called through with the same arguments).
//! 3. Enabled AfterUnconditional hooks run with the resolved result; their
//!    decisions are ignored.
//!
//! No lock is held while a callback runs, so hooks may register, enable or
//! disable other hooks and dispatch nested engine calls.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::{Mutex, RwLock};

use hookwork_engine::{EngineError, ObjectHandle, Value};

use super::context::{Arguments, CallContext, Decision, Invocation};
use super::guard::DirectCallGuard;
use super::registry::{HookCallback, HookError, HookKey, HookRegistry, Phase, TargetId};
use super::session::SessionSlots;

/// Original implementation of an engine function
pub type OriginalFn = Arc<dyn Fn(&Invocation) -> Result<Value, EngineError> + Send + Sync>;

/// State of the dispatch chain currently running on the main thread
#[derive(Default)]
struct ChainState {
    depth: usize,
    direct: Vec<TargetId>,
    session: SessionSlots,
}

/// Hook registry plus installed originals plus chain state
pub struct Dispatcher {
    registry: RwLock<HookRegistry>,
    originals: RwLock<HashMap<TargetId, OriginalFn>>,
    chain: Mutex<ChainState>,
}

static DISPATCHER: LazyLock<Arc<Dispatcher>> = LazyLock::new(|| Arc::new(Dispatcher::new()));

/// The process-wide dispatcher used by the plugin entry points
pub fn dispatcher() -> &'static Arc<Dispatcher> {
    &DISPATCHER
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(HookRegistry::new()),
            originals: RwLock::new(HashMap::new()),
            chain: Mutex::new(ChainState::default()),
        }
    }

    // ---- registration ----

    /// Register an enabled hook identified by its callback
    pub fn register<F>(&self, target: impl Into<TargetId>, phase: Phase, callback: F) -> HookKey
    where
        F: Fn(&mut CallContext<'_>) -> Decision + Send + Sync + 'static,
    {
        self.register_callback(target, phase, Arc::new(callback))
    }

    /// Register an already shared callback. The same `Arc` registered twice
    /// on the same target and phase yields the same key.
    pub fn register_callback(
        &self,
        target: impl Into<TargetId>,
        phase: Phase,
        callback: HookCallback,
    ) -> HookKey {
        self.registry.write().register(target.into(), phase, callback)
    }

    /// Register a hook identified by name
    pub fn register_named<F>(
        &self,
        target: impl Into<TargetId>,
        phase: Phase,
        name: &str,
        enabled: bool,
        callback: F,
    ) -> HookKey
    where
        F: Fn(&mut CallContext<'_>) -> Decision + Send + Sync + 'static,
    {
        self.registry
            .write()
            .register_named(target.into(), phase, name, enabled, Arc::new(callback))
    }

    /// Register a named hook that stays off until enabled
    pub fn register_disabled<F>(
        &self,
        target: impl Into<TargetId>,
        phase: Phase,
        name: &str,
        callback: F,
    ) -> HookKey
    where
        F: Fn(&mut CallContext<'_>) -> Decision + Send + Sync + 'static,
    {
        self.register_named(target, phase, name, false, callback)
    }

    pub fn enable(&self, key: HookKey) -> Result<(), HookError> {
        self.registry.write().enable(key)
    }

    pub fn disable(&self, key: HookKey) -> Result<(), HookError> {
        self.registry.write().disable(key)
    }

    pub fn is_enabled(&self, key: HookKey) -> bool {
        self.registry.read().is_enabled(key)
    }

    pub fn remove(&self, key: HookKey) -> Result<(), HookError> {
        self.registry.write().remove(key)
    }

    /// Name a hook was registered under
    pub fn hook_name(&self, key: HookKey) -> Option<String> {
        self.registry.read().get(key).map(|reg| reg.name.clone())
    }

    /// Enabled callbacks for `target` in `phase`, in registration order
    pub fn lookup(&self, target: &TargetId, phase: Phase) -> Vec<(HookKey, HookCallback)> {
        self.registry.read().lookup(target, phase)
    }

    // ---- originals ----

    /// Install the original function of a target, replacing any
    /// previous one
    pub fn install<F>(&self, target: impl Into<TargetId>, original: F)
    where
        F: Fn(&Invocation) -> Result<Value, EngineError> + Send + Sync + 'static,
    {
        let target = target.into();
        tracing::debug!("Installed original for {}", target);
        self.originals.write().insert(target, Arc::new(original));
    }

    fn original(&self, target: &TargetId) -> Result<OriginalFn, HookError> {
        self.originals
            .read()
            .get(target)
            .cloned()
            .ok_or_else(|| HookError::NotInstalled(target.to_string()))
    }

    /// Run the original under the call-through guard for its target
    pub fn call_original(&self, invocation: &Invocation) -> Result<Value, HookError> {
        let original = self.original(&invocation.target)?;
        let value =
            self.with_direct_call_protection(&invocation.target, || original(invocation))?;
        Ok(value)
    }

    // ---- call-through guard ----

    /// Run `f` with dispatches of `target` bypassing all hooks
    pub fn with_direct_call_protection<R>(
        &self,
        target: &TargetId,
        f: impl FnOnce() -> R,
    ) -> R {
        let _guard = DirectCallGuard::acquire(self, target.clone());
        f()
    }

    pub(crate) fn push_direct(&self, target: TargetId) {
        self.chain.lock().direct.push(target);
    }

    pub(crate) fn pop_direct(&self, target: &TargetId) {
        let mut chain = self.chain.lock();
        if let Some(pos) = chain.direct.iter().rposition(|t| t == target) {
            chain.direct.remove(pos);
        }
    }

    /// True while a call-through guard for `target` is alive
    pub fn is_direct_call(&self, target: &TargetId) -> bool {
        self.chain.lock().direct.contains(target)
    }

    // ---- session ----

    pub(crate) fn with_session<R>(&self, f: impl FnOnce(&mut SessionSlots) -> R) -> R {
        f(&mut self.chain.lock().session)
    }

    /// Nesting depth of the running dispatch chain; 0 when idle
    pub fn chain_depth(&self) -> usize {
        self.chain.lock().depth
    }

    // ---- dispatch ----

    /// Dispatch one engine call through its hooks
    pub fn dispatch(
        &self,
        target: impl Into<TargetId>,
        receiver: Option<ObjectHandle>,
        args: Arguments,
    ) -> Result<Value, HookError> {
        let invocation = Invocation {
            target: target.into(),
            receiver,
            args,
        };
        self.dispatch_invocation(&invocation)
    }

    pub fn dispatch_invocation(&self, invocation: &Invocation) -> Result<Value, HookError> {
        let target = &invocation.target;

        if off_main_thread() {
            tracing::warn!("{} dispatched off the main thread", target);
        }

        if self.is_direct_call(target) {
            tracing::trace!("Direct call to {}, skipping hooks", target);
            let original = self.original(target)?;
            return Ok(original(invocation)?);
        }

        let _chain = ChainScope::enter(self);
        let mut ctx = CallContext::new(self, invocation);

        for (key, callback) in self.lookup(target, Phase::Before) {
            // A hook earlier in this phase may have disabled it
            let enabled = self.is_enabled(key);
            if !enabled {
                continue;
            }
            if let Decision::Block(value) = callback(&mut ctx) {
                tracing::trace!("{:?} blocked {}", key, target);
                ctx.set_pending(value);
                break;
            }
        }

        let mut failure = None;
        if ctx.pending().is_unset() {
            let outcome = match ctx.cached_original() {
                Some(value) => Ok(value.clone()),
                None => self
                    .original(target)
                    .and_then(|original| original(invocation).map_err(HookError::from)),
            };
            match outcome {
                Ok(value) => ctx.set_pending(value),
                Err(e) => failure = Some(e),
            }
        }

        for (key, callback) in self.lookup(target, Phase::AfterUnconditional) {
            let enabled = self.is_enabled(key);
            if enabled {
                let _ = callback(&mut ctx);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(ctx.into_pending().into_value()),
        }
    }
}

/// True when host services are installed and the caller is not their thread.
/// Chain state assumes every dispatch happens on the main thread.
fn off_main_thread() -> bool {
    hookwork_engine::is_host_initialized() && !hookwork_engine::is_main_thread()
}

/// Depth bookkeeping for one dispatch. Session slots are reset when the
/// outermost dispatch starts and again when it returns.
struct ChainScope<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> ChainScope<'a> {
    fn enter(dispatcher: &'a Dispatcher) -> Self {
        let mut chain = dispatcher.chain.lock();
        if chain.depth == 0 {
            chain.session.clear_all();
        }
        chain.depth += 1;
        Self { dispatcher }
    }
}

impl Drop for ChainScope<'_> {
    fn drop(&mut self) {
        let mut chain = self.dispatcher.chain.lock();
        chain.depth = chain.depth.saturating_sub(1);
        if chain.depth == 0 {
            chain.session.clear_all();
        }
    }
}
