//! Global host service storage
//!
//! Host services are handed over once during plugin load and stored here.
//! Access is thread-safe via OnceLock.

use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;

use crate::host::{Audio, Hud, ObjectSource};
use crate::loader::ObjectCache;
use crate::EngineError;

/// Collaborators supplied by the host engine
pub struct HostServices {
    /// HUD message sink
    pub hud: Arc<dyn Hud>,

    /// Audio event playback
    pub audio: Arc<dyn Audio>,

    /// Named object lookup and player access
    pub objects: Arc<dyn ObjectSource>,

    /// Resolved named objects, pinned for the plugin lifetime
    pub cache: ObjectCache,

    /// Thread the services were created on
    main_thread_id: ThreadId,
}

impl HostServices {
    /// Create new HostServices bound to the calling thread
    ///
    /// # Arguments
    /// * `hud` - HUD message sink
    /// * `audio` - Audio playback
    /// * `objects` - Object lookup
    pub fn new(hud: Arc<dyn Hud>, audio: Arc<dyn Audio>, objects: Arc<dyn ObjectSource>) -> Self {
        Self {
            hud,
            audio,
            objects,
            cache: ObjectCache::new(),
            main_thread_id: std::thread::current().id(),
        }
    }

    /// True on the thread that created the services
    pub fn is_main_thread(&self) -> bool {
        std::thread::current().id() == self.main_thread_id
    }

    /// Resolve a named object once and reuse it afterwards
    pub fn resolve(&self, class: &str, name: &str) -> Result<crate::ObjectHandle, EngineError> {
        self.cache.resolve(self.objects.as_ref(), class, name)
    }

    /// Construct a kept-alive copy of `template`
    pub fn construct(
        &self,
        template: &crate::ObjectHandle,
        name: &str,
    ) -> Result<crate::ObjectHandle, EngineError> {
        let object = self
            .objects
            .construct_from_template(template, name)
            .ok_or_else(|| EngineError::ConstructFailed {
                class: template.class_name().to_string(),
                name: name.to_string(),
            })?;
        object.keep_alive()?;
        Ok(object)
    }
}

/// Global host storage
static HOST: OnceLock<Arc<HostServices>> = OnceLock::new();

/// Initialize host services
///
/// Called once during plugin load. Returns error if already initialized.
pub fn init_host(services: Arc<HostServices>) -> Result<(), EngineError> {
    HOST.set(services).map_err(|_| EngineError::AlreadyInitialized)
}

/// Get host services
pub fn host() -> Result<Arc<HostServices>, EngineError> {
    HOST.get().cloned().ok_or(EngineError::HostNotInitialized)
}

/// Check if host services are initialized
pub fn is_host_initialized() -> bool {
    HOST.get().is_some()
}

/// Check if current thread is the main game thread
pub fn is_main_thread() -> bool {
    HOST.get().is_some_and(|h| h.is_main_thread())
}
