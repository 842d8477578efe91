//! Error types for engine object access

/// Error type for engine object operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Object has no field with this name
    #[error("Field not found: {class}.{field}")]
    MissingField { class: String, field: String },

    /// Field or return value had an unexpected type
    #[error("Type mismatch for {what}: expected {expected}, found {found}")]
    TypeMismatch {
        what: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Engine method reported a failure
    #[error("Method {class}::{method} failed: {reason}")]
    MethodFailed {
        class: String,
        method: String,
        reason: String,
    },

    /// Named object lookup failed
    #[error("Object not found: {class} '{name}'")]
    ObjectNotFound { class: String, name: String },

    /// Template construction failed
    #[error("Failed to construct {class} '{name}' from template")]
    ConstructFailed { class: String, name: String },

    /// Snapshot could not be turned into an object
    #[error("Invalid object snapshot: {0}")]
    InvalidSnapshot(String),

    /// Host services were requested before plugin load
    #[error("Host services not initialized")]
    HostNotInitialized,

    /// Host services already set
    #[error("Host services already initialized")]
    AlreadyInitialized,
}
