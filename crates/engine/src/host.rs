//! Host collaborator interfaces
//!
//! Fire-and-forget services supplied by the host. Nothing the core does
//! depends on their return values.

use crate::object::ObjectHandle;

/// On-screen notifications
pub trait Hud: Send + Sync {
    /// Show a titled HUD message
    fn show_message(&self, title: &str, text: &str);
}

/// Audio playback
pub trait Audio: Send + Sync {
    /// Play an audio event from `emitter` (usually the player's pawn)
    fn play_event(&self, emitter: &ObjectHandle, event: &ObjectHandle);
}

/// Access to engine objects that are not reached through a hook's arguments
pub trait ObjectSource: Send + Sync {
    /// Find a named object of the given class
    fn find_object(&self, class: &str, name: &str) -> Option<ObjectHandle>;

    /// Create a new object named `name`, initialised from `template`
    fn construct_from_template(&self, template: &ObjectHandle, name: &str) -> Option<ObjectHandle>;

    /// The local player controller, if a game is running
    fn player_controller(&self) -> Option<ObjectHandle>;
}
