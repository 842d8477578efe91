//! hookwork Engine - Host Object Model and Collaborator Storage
//!
//! This crate handles:
//! - The dynamically typed [`Value`] exchanged with the host engine
//! - Engine objects as capability bags ([`EngineObject`], [`ObjectHandle`])
//! - An in-memory object implementation ([`PropertyBag`]) for adapters and tests
//! - Host collaborators (HUD, audio, object lookup) and their global storage
//! - Cached, keep-alive resolution of named engine objects
//!
//! # Architecture
//!
//! Host services are handed over once during plugin load via [`init_host`]
//! and stored in [`globals::HostServices`]. Mods receive an `Arc` of the same
//! services so they can be exercised without a running engine.
//!
//! # Thread Safety
//!
//! All engine objects are only touched from the host's main thread. The main
//! thread ID is stored for runtime checks via [`is_main_thread()`].

pub mod error;
pub mod globals;
pub mod host;
pub mod loader;
pub mod object;
pub mod value;
pub mod view;

pub use error::EngineError;
pub use globals::{host, init_host, is_host_initialized, is_main_thread, HostServices};
pub use host::{Audio, Hud, ObjectSource};
pub use loader::ObjectCache;
pub use object::{EngineObject, MethodFn, ObjectFlags, ObjectHandle, PropertyBag};
pub use value::{FromValue, Value};
pub use view::ObjectView;
