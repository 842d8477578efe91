//! Mod options and keybinds
//!
//! Options are small typed settings with an optional range and a change
//! callback. They back the UI sliders and toggles of a mod and are seeded
//! from its config file.
//!
//! # Example
//!
//! ```ignore
//! use hookwork_core::options::SliderOption;
//!
//! let size = SliderOption::new("Size", 100, "Text scale in percent")
//!     .with_range(0, 500)
//!     .with_on_change(|old, new| tracing::info!("Size changed: {} -> {}", old, new));
//!
//! size.set(800); // clamped to 500
//! assert_eq!(size.get(), 500);
//! ```

pub mod keybind;

use std::sync::Arc;

use parking_lot::RwLock;

pub use keybind::{keybinds, Keybind, KeybindCallback, KeybindKey, KeybindRegistry};

/// Option and keybind errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option {name}")]
    InvalidValue { name: String, value: String },

    #[error("Keybind not found")]
    UnknownKeybind,
}

/// Types usable as option values
pub trait OptionValue: Clone + PartialOrd + Send + Sync + 'static {
    fn parse(s: &str) -> Option<Self>;

    fn display(&self) -> String;
}

impl OptionValue for bool {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn display(&self) -> String {
        if *self { "On" } else { "Off" }.to_string()
    }
}

impl OptionValue for i64 {
    fn parse(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn display(&self) -> String {
        self.to_string()
    }
}

impl OptionValue for f64 {
    fn parse(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn display(&self) -> String {
        self.to_string()
    }
}

impl OptionValue for String {
    fn parse(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn display(&self) -> String {
        self.clone()
    }
}

/// Change callback, called with the old and new value
pub type OnChangeFn<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// A typed mod option
pub struct ModOption<T: OptionValue> {
    name: String,
    description: String,
    value: RwLock<T>,
    default: T,
    min: Option<T>,
    max: Option<T>,
    on_change: Option<OnChangeFn<T>>,
}

/// Integer slider
pub type SliderOption = ModOption<i64>;

/// On/off toggle
pub type BoolOption = ModOption<bool>;

impl<T: OptionValue> ModOption<T> {
    pub fn new(name: impl Into<String>, default: T, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: RwLock::new(default.clone()),
            default,
            min: None,
            max: None,
            on_change: None,
        }
    }

    /// Set minimum and maximum (builder pattern)
    pub fn with_range(mut self, min: T, max: T) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    /// Set change callback (builder pattern)
    pub fn with_on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Store a value, clamped to the range. Returns false if it was clamped.
    pub fn set(&self, value: T) -> bool {
        let (value, clamped) = self.clamp(value);
        let old = std::mem::replace(&mut *self.value.write(), value.clone());

        // Lock released; the callback may read this option
        if let Some(callback) = &self.on_change {
            callback(&old, &value);
        }

        !clamped
    }

    /// Store a value without notifying the change callback
    pub fn set_silent(&self, value: T) {
        let (value, _) = self.clamp(value);
        *self.value.write() = value;
    }

    fn clamp(&self, mut value: T) -> (T, bool) {
        let mut clamped = false;
        if let Some(min) = &self.min {
            if value < *min {
                value = min.clone();
                clamped = true;
            }
        }
        if let Some(max) = &self.max {
            if value > *max {
                value = max.clone();
                clamped = true;
            }
        }
        (value, clamped)
    }

    pub fn reset(&self) {
        self.set(self.default.clone());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn range(&self) -> (Option<&T>, Option<&T>) {
        (self.min.as_ref(), self.max.as_ref())
    }

    pub fn is_default(&self) -> bool {
        self.get() == self.default
    }
}

/// Type-erased option, for grouping options of different types
pub trait DynOption: Send + Sync {
    fn name(&self) -> &str;

    fn display_value(&self) -> String;

    /// Parse and store a value
    fn set_from_str(&self, value: &str) -> Result<(), OptionError>;
}

impl<T: OptionValue> DynOption for ModOption<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_value(&self) -> String {
        self.get().display()
    }

    fn set_from_str(&self, value: &str) -> Result<(), OptionError> {
        let parsed = T::parse(value).ok_or_else(|| OptionError::InvalidValue {
            name: self.name.clone(),
            value: value.to_string(),
        })?;
        self.set(parsed);
        Ok(())
    }
}

/// Named, ordered collection of options shown together
pub struct OptionGroup {
    name: String,
    children: Vec<Arc<dyn DynOption>>,
}

impl OptionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Add an option (builder pattern)
    pub fn with<O: DynOption + 'static>(mut self, option: Arc<O>) -> Self {
        self.children.push(option);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynOption>> {
        self.children.iter().find(|o| o.name() == name)
    }

    pub fn set(&self, name: &str, value: &str) -> Result<(), OptionError> {
        self.get(name)
            .ok_or_else(|| OptionError::UnknownOption(name.to_string()))?
            .set_from_str(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DynOption>> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn test_slider_clamps() {
        let slider = SliderOption::new("Red", 255, "Red channel").with_range(0, 255);

        assert!(!slider.set(300));
        assert_eq!(slider.get(), 255);
        assert!(!slider.set(-5));
        assert_eq!(slider.get(), 0);
        assert!(slider.set(128));
        assert_eq!(slider.get(), 128);

        slider.reset();
        assert!(slider.is_default());
    }

    #[test]
    fn test_on_change_sees_old_and_new() {
        let last = Arc::new(AtomicI64::new(-1));
        let seen = Arc::clone(&last);
        let slider = SliderOption::new("Size", 100, "Scale")
            .with_range(0, 500)
            .with_on_change(move |old, new| {
                assert_eq!(*old, 100);
                seen.store(*new, Ordering::SeqCst);
            });

        slider.set(800);
        assert_eq!(last.load(Ordering::SeqCst), 500);
    }

    #[test]
    fn test_silent_set_skips_callback() {
        let toggle = BoolOption::new("Enable Text", true, "Show overlay")
            .with_on_change(|_, _| panic!("callback must not run"));
        toggle.set_silent(false);
        assert!(!toggle.get());
    }

    #[test]
    fn test_group_set_by_name() {
        let red = Arc::new(SliderOption::new("Red", 255, "").with_range(0, 255));
        let shown = Arc::new(BoolOption::new("Enable Text", true, ""));
        let group = OptionGroup::new("Text Settings")
            .with(Arc::clone(&red))
            .with(Arc::clone(&shown));

        group.set("Red", "10").unwrap();
        group.set("Enable Text", "off").unwrap();
        assert_eq!(red.get(), 10);
        assert!(!shown.get());
        assert_eq!(group.get("Red").map(|o| o.display_value()), Some("10".to_string()));

        assert_eq!(
            group.set("Blue", "1"),
            Err(OptionError::UnknownOption("Blue".to_string()))
        );
        assert!(matches!(
            group.set("Red", "lots"),
            Err(OptionError::InvalidValue { .. })
        ));
    }
}
