//! Named object resolution with caching
//!
//! Looking an object up by name walks the engine's whole object table, so
//! lookups are done once and the result is pinned with the keep-alive flag.

use dashmap::DashMap;

use crate::host::ObjectSource;
use crate::object::ObjectHandle;
use crate::EngineError;

/// Cache of resolved named objects keyed by `(class, name)`
#[derive(Default)]
pub struct ObjectCache {
    entries: DashMap<(String, String), ObjectHandle>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an object through `source`, caching the result
    ///
    /// The first successful lookup marks the object keep-alive so later
    /// cache hits never hand out a collected object.
    #[tracing::instrument(skip(self, source))]
    pub fn resolve(
        &self,
        source: &dyn ObjectSource,
        class: &str,
        name: &str,
    ) -> Result<ObjectHandle, EngineError> {
        let key = (class.to_string(), name.to_string());
        if let Some(cached) = self.entries.get(&key) {
            return Ok(cached.clone());
        }

        let object = source
            .find_object(class, name)
            .ok_or_else(|| EngineError::ObjectNotFound {
                class: class.to_string(),
                name: name.to_string(),
            })?;
        object.keep_alive()?;
        tracing::debug!("Resolved {} '{}'", class, name);

        Ok(self.entries.entry(key).or_insert(object).clone())
    }

    /// Number of cached objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every cached object
    pub fn clear(&self) {
        self.entries.clear();
    }
}
