//! Transient session slots
//!
//! Named string cells that carry a value from one hook to another within a
//! single dispatch chain. The dispatcher resets them whenever the outermost
//! dispatch starts or returns, so nothing written during one engine event
//! can be observed by the next.

use std::collections::HashMap;

/// Slots of one dispatch chain. The empty string means "nothing pending".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionSlots {
    slots: HashMap<String, String>,
}

impl SessionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writing an empty value clears the slot
    pub fn write(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.slots.remove(name);
        } else {
            self.slots.insert(name.to_string(), value);
        }
    }

    pub fn peek(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    /// Read and clear
    pub fn take(&mut self, name: &str) -> String {
        self.slots.remove(name).unwrap_or_default()
    }

    pub fn clear(&mut self, name: &str) {
        self.slots.remove(name);
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
