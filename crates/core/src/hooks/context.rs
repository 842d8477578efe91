//! Call context handed to hook callbacks
//!
//! A [`CallContext`] is the hook's view of one intercepted invocation: the
//! target, the receiver object, the arguments, the in-flight result and the
//! ability to call the original function.

use hookwork_engine::{EngineError, FromValue, ObjectHandle, Value};

use super::dispatch::Dispatcher;
use super::registry::{HookError, TargetId};

/// The in-flight return value of a dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PendingResult {
    /// Nothing has decided the result yet
    #[default]
    Unset,
    /// A Before hook blocked with this value, or the original returned it
    Value(Value),
}

impl PendingResult {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Unset => None,
            Self::Value(v) => Some(v),
        }
    }

    /// The resolved value; `Unset` resolves to [`Value::None`]
    pub fn into_value(self) -> Value {
        match self {
            Self::Unset => Value::None,
            Self::Value(v) => v,
        }
    }
}

/// What a hook wants the dispatcher to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Proceed with the remaining hooks and the original
    Continue,
    /// Skip the remaining Before hooks and the original; return this value
    Block(Value),
}

impl Decision {
    pub fn block(value: impl Into<Value>) -> Self {
        Self::Block(value.into())
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}

/// Ordered, named arguments of an invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<(String, Value)>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument (builder pattern)
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Read an argument and convert it
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, EngineError> {
        self.get(name)
            .ok_or_else(|| EngineError::MissingField {
                class: "Arguments".to_string(),
                field: name.to_string(),
            })?
            .convert(name)
    }

    /// Nullable object argument; missing and null both yield `None`
    pub fn object(&self, name: &str) -> Option<&ObjectHandle> {
        self.get(name).and_then(Value::as_object)
    }

    /// A copy with `name` set to `value`, appended if absent
    pub fn replaced(&self, name: &str, value: impl Into<Value>) -> Self {
        let mut args = self.clone();
        let value = value.into();
        match args.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => args.0.push((name.to_string(), value)),
        }
        args
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

/// One call of an engine function, as handed to its original function
#[derive(Debug, Clone)]
pub struct Invocation {
    pub target: TargetId,
    pub receiver: Option<ObjectHandle>,
    pub args: Arguments,
}

/// Hook callback context
pub struct CallContext<'a> {
    dispatcher: &'a Dispatcher,
    invocation: &'a Invocation,
    pending: PendingResult,
    /// Result of calling the original with the invocation's own arguments
    original: Option<Value>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher, invocation: &'a Invocation) -> Self {
        Self {
            dispatcher,
            invocation,
            pending: PendingResult::Unset,
            original: None,
        }
    }

    pub fn target(&self) -> &TargetId {
        &self.invocation.target
    }

    /// The object the function was invoked on
    pub fn receiver(&self) -> Option<&ObjectHandle> {
        self.invocation.receiver.as_ref()
    }

    pub fn args(&self) -> &Arguments {
        &self.invocation.args
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.invocation.args.get(name)
    }

    pub fn pending(&self) -> &PendingResult {
        &self.pending
    }

    pub(crate) fn set_pending(&mut self, value: Value) {
        self.pending = PendingResult::Value(value);
    }

    pub(crate) fn into_pending(self) -> PendingResult {
        self.pending
    }

    /// The dispatcher running this hook, for enabling or disabling other hooks
    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    /// Call the original with this invocation's own arguments.
    ///
    /// The first result is cached: later calls, and the dispatcher's own
    /// call-through when nothing blocks, reuse it instead of running the
    /// original again.
    pub fn invoke_original(&mut self) -> Result<Value, HookError> {
        if let Some(value) = &self.original {
            return Ok(value.clone());
        }
        let value = self.dispatcher.call_original(self.invocation)?;
        self.original = Some(value.clone());
        Ok(value)
    }

    /// Call the original with different arguments. Never cached.
    pub fn invoke_original_with(&self, args: Arguments) -> Result<Value, HookError> {
        let invocation = Invocation {
            target: self.invocation.target.clone(),
            receiver: self.invocation.receiver.clone(),
            args,
        };
        self.dispatcher.call_original(&invocation)
    }

    pub(crate) fn cached_original(&self) -> Option<&Value> {
        self.original.as_ref()
    }

    /// Write a session slot of the current dispatch chain
    pub fn write_slot(&self, name: &str, value: impl Into<String>) {
        self.dispatcher.with_session(|slots| slots.write(name, value));
    }

    /// Read and clear a session slot; empty when never written
    pub fn take_slot(&self, name: &str) -> String {
        self.dispatcher.with_session(|slots| slots.take(name))
    }

    /// Read a session slot without clearing it
    pub fn peek_slot(&self, name: &str) -> String {
        self.dispatcher
            .with_session(|slots| slots.peek(name).unwrap_or_default().to_string())
    }

    pub fn clear_slot(&self, name: &str) {
        self.dispatcher.with_session(|slots| slots.clear(name));
    }
}
