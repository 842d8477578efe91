//! Engine objects as capability bags
//!
//! The host engine exposes its objects through reflection: every object has
//! a class name, named fields holding [`Value`]s, and callable methods. The
//! core never formalizes more than that; typed views are layered on top with
//! `#[derive(ObjectView)]` or hand-written capability traits.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::{Mutex, RwLock};

use crate::value::{FromValue, Value};
use crate::EngineError;

bitflags! {
    /// Object lifetime flags stored in the engine's `ObjectFlags` field
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u64 {
        /// Object survives garbage collection while referenced only by us
        const KEEP_ALIVE = 0x4000;
    }
}

/// A reflected engine object
pub trait EngineObject: Send + Sync {
    /// Class name as reported by the engine (e.g. "WillowInventory")
    fn class_name(&self) -> &str;

    /// Read a field. `None` if the object has no such field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write a field
    fn set(&self, field: &str, value: Value) -> Result<(), EngineError>;

    /// Invoke a method by name
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, EngineError>;
}

/// Shared reference to an engine object
///
/// Equality is identity: two handles are equal when they point at the same
/// object.
#[derive(Clone)]
pub struct ObjectHandle(Arc<dyn EngineObject>);

impl ObjectHandle {
    /// Field holding [`ObjectFlags`]
    pub const FLAGS_FIELD: &'static str = "ObjectFlags";

    pub fn new<T: EngineObject + 'static>(object: T) -> Self {
        Self(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn EngineObject>) -> Self {
        Self(object)
    }

    pub fn class_name(&self) -> &str {
        self.0.class_name()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.get(field)
    }

    /// Read a field and convert it
    pub fn get_as<T: FromValue>(&self, field: &str) -> Result<T, EngineError> {
        let value = self.0.get(field).ok_or_else(|| EngineError::MissingField {
            class: self.class_name().to_string(),
            field: field.to_string(),
        })?;
        value.convert(field)
    }

    /// Read a nullable object reference. Missing and null both yield `None`.
    pub fn object(&self, field: &str) -> Option<ObjectHandle> {
        self.0.get(field).and_then(|v| v.as_object().cloned())
    }

    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<(), EngineError> {
        self.0.set(field, value.into())
    }

    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, EngineError> {
        self.0.call(method, args)
    }

    /// Invoke a method and convert its return value
    pub fn call_as<T: FromValue>(&self, method: &str, args: &[Value]) -> Result<T, EngineError> {
        self.0.call(method, args)?.convert(method)
    }

    /// Current lifetime flags; objects without the field report none set
    pub fn flags(&self) -> ObjectFlags {
        self.0
            .get(Self::FLAGS_FIELD)
            .and_then(|v| v.as_int())
            .map(|raw| ObjectFlags::from_bits_retain(raw as u64))
            .unwrap_or_else(ObjectFlags::empty)
    }

    /// Pin the object so the engine does not collect it
    pub fn keep_alive(&self) -> Result<(), EngineError> {
        let flags = self.flags() | ObjectFlags::KEEP_ALIVE;
        self.0.set(Self::FLAGS_FIELD, Value::Int(flags.bits() as i64))
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({} @ {:p})", self.class_name(), Arc::as_ptr(&self.0))
    }
}

/// Method implementation on a [`PropertyBag`]
pub type MethodFn = Arc<dyn Fn(&PropertyBag, &[Value]) -> Result<Value, EngineError> + Send + Sync>;

/// In-memory engine object: a field map plus registered methods
///
/// Adapters use it to stand in for engine objects that only exist as plain
/// data, and tests use it to build whole object graphs. Every method call is
/// recorded. Methods without an implementation are treated as fire-and-forget
/// and return [`Value::None`].
pub struct PropertyBag {
    class_name: String,
    fields: RwLock<HashMap<String, Value>>,
    methods: RwLock<HashMap<String, MethodFn>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl PropertyBag {
    /// Key naming the class in a JSON snapshot
    pub const CLASS_KEY: &'static str = "$class";

    /// Class used when a snapshot does not name one
    pub const ANONYMOUS_CLASS: &'static str = "Object";

    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: RwLock::new(HashMap::new()),
            methods: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Build an object from a JSON snapshot
    pub fn from_json(json: &serde_json::Value) -> Result<ObjectHandle, EngineError> {
        match Value::from(json) {
            Value::Object(handle) => Ok(handle),
            other => Err(EngineError::InvalidSnapshot(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }

    /// Set a field (builder pattern)
    pub fn with_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Register a method implementation (builder pattern)
    pub fn with_method<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&PropertyBag, &[Value]) -> Result<Value, EngineError> + Send + Sync + 'static,
    {
        self.methods.write().insert(name.to_string(), Arc::new(f));
        self
    }

    pub fn insert(&self, name: &str, value: impl Into<Value>) {
        self.fields.write().insert(name.to_string(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.fields.write().remove(name)
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    /// All recorded method calls, oldest first
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().clone()
    }

    /// Arguments of every recorded call to `method`
    pub fn calls_to(&self, method: &str) -> Vec<Vec<Value>> {
        self.calls
            .lock()
            .iter()
            .filter(|(name, _)| name == method)
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub fn into_handle(self) -> ObjectHandle {
        ObjectHandle::new(self)
    }
}

impl EngineObject for PropertyBag {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.field(field)
    }

    fn set(&self, field: &str, value: Value) -> Result<(), EngineError> {
        self.insert(field, value);
        Ok(())
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, EngineError> {
        self.calls.lock().push((method.to_string(), args.to_vec()));

        // Clone out so the method may re-enter the bag
        let implementation = self.methods.read().get(method).cloned();
        match implementation {
            Some(f) => f(self, args),
            None => Ok(Value::None),
        }
    }
}
