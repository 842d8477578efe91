//! Engine identity strings
//!
//! These strings must match exactly what the engine's reflection layer
//! reports. Nothing outside the plugin adapters should spell them out.

/// Controller noticed a pickupable in front of the player
pub const SAW_PICKUPABLE: &str = "WillowGame.WillowPlayerController:SawPickupable";

/// Controller stopped looking at a pickupable
pub const CLEAR_SEEN_PICKUPABLE: &str = "WillowGame.WillowPlayerController:ClearSeenPickupable";

/// Weapon cycling
pub const NEXT_WEAPON: &str = "WillowGame.WillowPlayerController:NextWeapon";

/// Save permission query
pub const CAN_SAVE_GAME: &str = "WillowGame.WillowPlayerController:CanSaveGame";

/// Backpack panel tooltip computation
pub const SET_TOOLTIP_TEXT: &str = "WillowGame.StatusMenuInventoryPanelGFxObject:SetTooltipText";

/// Backpack panel key input
pub const BACKPACK_INPUT_KEY: &str = "WillowGame.StatusMenuInventoryPanelGFxObject:NormalInputKey";

/// Generic UI markup resolution, used by every movie
pub const RESOLVE_MARKUP: &str = "GFxUI.GFxMoviePlayer:ResolveDataStoreMarkup";

/// Viewport overlay render pass
pub const POST_RENDER: &str = "WillowGame.WillowGameViewportClient:PostRender";

/// Audio event played on a sale
pub const SELL_SOUND: (&str, &str) = ("AkEvent", "Ake_UI.UI_Vending.Ak_Play_UI_Vending_Sell");

/// Template of the sell prompt's interaction icon
pub const SELL_ICON_TEMPLATE: (&str, &str) = (
    "InteractionIconDefinition",
    "GD_InteractionIcons.Default.Icon_DefaultUse",
);

/// Name given to icons constructed from the template
pub const SELL_ICON_NAME: &str = "SecondaryUse";

/// Font used by the autosave overlay
pub const OVERLAY_FONT: (&str, &str) = ("Font", "UI_Fonts.Font_Willowbody_18pt");

/// Item classes that can never be sold
pub const UNSELLABLE_CLASSES: &[&str] = &["WillowUsableItem", "WillowMissionItem"];

