//! Typed views over engine objects
//!
//! A view wraps an [`ObjectHandle`] and exposes typed accessors for the
//! handful of fields a call site cares about. Views are normally generated
//! with `#[derive(ObjectView)]` from `hookwork-macros`.

use crate::object::ObjectHandle;

/// Typed wrapper around an engine object
pub trait ObjectView: Sized {
    /// Engine class the view was written against
    const CLASS_NAME: &'static str;

    /// Wrap a handle without checking its class
    fn from_handle(handle: ObjectHandle) -> Self;

    /// The wrapped handle
    fn handle(&self) -> &ObjectHandle;

    /// Wrap a handle if its class matches [`Self::CLASS_NAME`]
    fn from_handle_checked(handle: ObjectHandle) -> Option<Self> {
        (handle.class_name() == Self::CLASS_NAME).then(|| Self::from_handle(handle))
    }
}
