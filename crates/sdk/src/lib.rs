//! hookwork SDK - Host Engine Vocabulary
//!
//! This crate contains the small, dependency-free vocabulary shared by every
//! other hookwork crate: network roles, inventory marks, input events and the
//! engine identity strings the plugins bind to.
//!
//! # Modules
//!
//! - [`roles`] - Network role and inventory mark enums
//! - [`input`] - Key events and default key names
//! - [`targets`] - Engine function and object identity strings

pub mod input;
pub mod roles;
pub mod targets;

pub use input::InputEvent;
pub use roles::{ItemMark, NetRole};
