//! Engine functions the mods hook
//!
//! Mods name targets through [`Target`]; the engine's string identities
//! only appear in [`Target::as_str`].

use hookwork_core::hooks::TargetId;
use hookwork_sdk::targets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The player looks at a pickup
    SawPickupable,
    /// The player looks away from a pickup
    ClearSeenPickupable,
    /// Cycle to the next weapon
    NextWeapon,
    /// Whether the game may save now
    CanSaveGame,
    /// Backpack panel computes its tooltip
    SetTooltipText,
    /// Key input while the backpack panel is open
    BackpackInputKey,
    /// UI-wide markup resolution
    ResolveMarkup,
    /// Viewport overlay drawing
    PostRender,
}

impl Target {
    pub const ALL: [Target; 8] = [
        Target::SawPickupable,
        Target::ClearSeenPickupable,
        Target::NextWeapon,
        Target::CanSaveGame,
        Target::SetTooltipText,
        Target::BackpackInputKey,
        Target::ResolveMarkup,
        Target::PostRender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::SawPickupable => targets::SAW_PICKUPABLE,
            Target::ClearSeenPickupable => targets::CLEAR_SEEN_PICKUPABLE,
            Target::NextWeapon => targets::NEXT_WEAPON,
            Target::CanSaveGame => targets::CAN_SAVE_GAME,
            Target::SetTooltipText => targets::SET_TOOLTIP_TEXT,
            Target::BackpackInputKey => targets::BACKPACK_INPUT_KEY,
            Target::ResolveMarkup => targets::RESOLVE_MARKUP,
            Target::PostRender => targets::POST_RENDER,
        }
    }

    /// Look a target up by its engine identity
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl From<Target> for TargetId {
    fn from(target: Target) -> Self {
        TargetId::from(target.as_str())
    }
}
