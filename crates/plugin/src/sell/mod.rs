//! Cleaning Up Pandora+
//!
//! Sell items straight from the ground or from the backpack. Sales credit
//! the item's value, remove it, and keep a clone in the vendor's buyback
//! list.
//!
//! Hooks:
//! - `SawPickupable` shows a "SELL ITEM" prompt and, for gamepad users,
//!   locks weapon swapping (the secondary use button doubles as swap)
//! - `ClearSeenPickupable` / `NextWeapon` release and enforce that lock
//! - `NormalInputKey` sells the selected backpack item on the sell key
//! - `SetTooltipText` + `ResolveDataStoreMarkup` append the sell hint to the
//!   backpack tooltip through markup mediation

mod adapters;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use hookwork_core::engine::{EngineError, HostServices, ObjectHandle, ObjectView, PropertyBag, Value};
use hookwork_core::hooks::{CallContext, Decision, Dispatcher, MarkupMediation};
use hookwork_core::sdk::input::{GAMEPAD_START, GAMEPAD_START_MARKUP};
use hookwork_core::sdk::targets::{SELL_ICON_NAME, SELL_ICON_TEMPLATE};
use hookwork_core::sdk::InputEvent;
use hookwork_core::{
    hook, KeybindKey, KeybindRegistry, Mod, ModBuilder, ModError, SalePolicy, SaleError,
    SaleReceipt, SaleRejected, SaleSource, SellTransaction,
};

use crate::config::SellConfig;
use crate::targets::Target;
use crate::views::{InventoryPanel, PlayerController};

pub use adapters::{EngineLedger, HostFeedback, Origin, SaleItem};

pub const MOD_NAME: &str = "Cleaning Up Pandora+";

/// Dollar sign in the interaction icon atlas
const SELL_ICON: i64 = 4;

/// Shared state of the sell mod's hooks and keybind
pub struct SellState {
    services: Arc<HostServices>,
    config: SellConfig,
    policy: SalePolicy,
    keybinds: Arc<KeybindRegistry>,
    sell_bind: OnceLock<KeybindKey>,
    can_swap: AtomicBool,
}

impl SellState {
    pub fn new(services: Arc<HostServices>, keybinds: Arc<KeybindRegistry>, config: SellConfig) -> Self {
        Self {
            services,
            config,
            policy: SalePolicy::default(),
            keybinds,
            sell_bind: OnceLock::new(),
            can_swap: AtomicBool::new(true),
        }
    }

    pub fn config(&self) -> &SellConfig {
        &self.config
    }

    pub fn sell_bind(&self) -> Option<KeybindKey> {
        self.sell_bind.get().copied()
    }

    /// Effective key of the sell keybind
    pub fn sell_key(&self) -> Option<String> {
        self.sell_bind().and_then(|key| self.keybinds.effective_key(key))
    }

    pub fn can_swap(&self) -> bool {
        self.can_swap.load(Ordering::Acquire)
    }

    fn controller(&self) -> Result<PlayerController, EngineError> {
        self.services
            .objects
            .player_controller()
            .map(PlayerController::from_handle)
            .ok_or_else(|| EngineError::ObjectNotFound {
                class: "WillowPlayerController".to_string(),
                name: "local player".to_string(),
            })
    }

    fn inventory_manager(&self, controller: &PlayerController) -> Result<crate::views::InventoryManager, EngineError> {
        controller
            .inventory_manager()?
            .ok_or_else(|| EngineError::ObjectNotFound {
                class: "WillowInventoryManager".to_string(),
                name: "pawn inventory".to_string(),
            })
    }

    /// Keyboard users press the sell key; gamepad users press Start
    fn is_sell_key(&self, key: &str, using_gamepad: bool) -> bool {
        if using_gamepad {
            key.contains(GAMEPAD_START)
        } else {
            self.sell_key().is_some_and(|sell| sell == key)
        }
    }

    /// Sell the pickup the player is looking at
    pub fn sell_seen_pickup(&self) -> Result<SaleReceipt, SaleError> {
        let controller = self.controller()?;
        let manager = self.inventory_manager(&controller)?;
        let item = controller.seen_pickup().and_then(SaleItem::world);

        let mut ledger = EngineLedger {
            controller: &controller,
            manager: &manager,
            shrink_duration: self.config.shrink_duration,
            buyback_capacity: self.config.buyback_capacity,
        };
        let feedback = HostFeedback {
            services: &self.services,
            controller: &controller,
            title: &self.config.message_title,
            panel: None,
        };

        SellTransaction::new(&self.policy, SaleSource::World).execute(
            controller.net_role()?,
            item.as_ref(),
            &mut ledger,
            &feedback,
        )
    }

    /// Sell the item selected in the backpack panel
    pub fn sell_selected(&self, panel: &InventoryPanel) -> Result<SaleReceipt, SaleError> {
        let controller = self.controller()?;
        let manager = self.inventory_manager(&controller)?;
        let item = panel
            .selected_item()?
            .map(|inventory| SaleItem::backpack(inventory, panel));

        let mut ledger = EngineLedger {
            controller: &controller,
            manager: &manager,
            shrink_duration: self.config.shrink_duration,
            buyback_capacity: self.config.buyback_capacity,
        };
        let feedback = HostFeedback {
            services: &self.services,
            controller: &controller,
            title: &self.config.message_title,
            panel: Some(panel),
        };

        let result = SellTransaction::new(&self.policy, SaleSource::Backpack).execute(
            controller.net_role()?,
            item.as_ref(),
            &mut ledger,
            &feedback,
        );

        if let Some(
            reason @ (SaleRejected::NothingSelected | SaleRejected::Equipped | SaleRejected::Favorited),
        ) = result.as_ref().err().and_then(SaleError::rejection)
        {
            panel.play_failure_sound()?;
            panel.flourish(&format!("Error: {reason}."))?;
        }
        result
    }

    /// Tooltip text for the sell hint, `None` when no hint applies
    fn tooltip_hint(&self, panel: &InventoryPanel) -> Option<String> {
        if panel.is_equipped_view() {
            return None;
        }
        let controller = self.controller().ok()?;
        if controller.using_gamepad() {
            Some(format!("{GAMEPAD_START_MARKUP} Sell Item"))
        } else {
            self.sell_key().map(|key| format!("[{key}] Sell Item"))
        }
    }

    /// Interaction prompt struct passed to `ShowToolTip`. The icon is a
    /// fresh copy of the default use icon with the sell text on it.
    fn sell_prompt(&self) -> Result<ObjectHandle, EngineError> {
        let (class, name) = SELL_ICON_TEMPLATE;
        let template = self.services.resolve(class, name)?;
        let icon = self.services.construct(&template, SELL_ICON_NAME)?;
        icon.set("Icon", SELL_ICON)?;
        icon.set("Action", "")?;
        icon.set("Text", format!("[{}] SELL ITEM", self.sell_key().unwrap_or_default()))?;

        Ok(PropertyBag::new("InteractionIconWithOverrides")
            .with_field("IconDef", icon)
            .with_field("OverrideIconDef", Value::None)
            .with_field("bOverrideIcon", false)
            .with_field("bOverrideAction", false)
            .with_field("bOverrideText", false)
            .with_field("bCostsToUse", 0)
            .with_field("CostsCurrencyType", 0)
            .with_field("CostsAmount", 0)
            .into_handle())
    }
}

#[hook(Target::SawPickupable)]
fn show_sell_prompt(state: &SellState, ctx: &mut CallContext) -> Decision {
    let Some(item) = ctx
        .args()
        .object("Pickup")
        .and_then(|pickup| pickup.object("Inventory"))
    else {
        return Decision::Continue;
    };
    if state.policy.is_excluded(item.class_name()) {
        return Decision::Continue;
    }
    let Some(controller) = ctx.receiver().cloned().map(PlayerController::from_handle) else {
        return Decision::Continue;
    };

    // No HUD right after closing the inventory
    let movie = match controller.hud_movie() {
        Ok(Some(movie)) => movie,
        Ok(None) => return Decision::Continue,
        Err(e) => {
            tracing::warn!("Failed to get HUD movie: {}", e);
            return Decision::Continue;
        }
    };

    let shown = state
        .sell_prompt()
        .and_then(|prompt| movie.call("ShowToolTip", &[Value::Object(prompt), Value::Int(1)]));
    if let Err(e) = shown {
        tracing::warn!("Failed to show sell prompt: {}", e);
    }
    if state.config.block_swap_on_gamepad && controller.using_gamepad() {
        state.can_swap.store(false, Ordering::Release);
    }
    Decision::Continue
}

#[hook(Target::ClearSeenPickupable)]
fn release_weapon_swap(state: &SellState, _ctx: &mut CallContext) -> Decision {
    state.can_swap.store(true, Ordering::Release);
    Decision::Continue
}

#[hook(Target::NextWeapon)]
fn gate_weapon_swap(state: &SellState, _ctx: &mut CallContext) -> Decision {
    if state.can_swap() {
        Decision::Continue
    } else {
        Decision::Block(Value::None)
    }
}

#[hook(Target::BackpackInputKey)]
fn sell_from_backpack(state: &SellState, ctx: &mut CallContext) -> Decision {
    let Some(panel) = ctx.receiver().cloned().map(InventoryPanel::from_handle) else {
        return Decision::Continue;
    };
    let Ok(controller) = state.controller() else {
        return Decision::Continue;
    };

    let key = ctx.args().get_as::<String>("ukey").unwrap_or_default();
    if !state.is_sell_key(&key, controller.using_gamepad()) {
        return Decision::Continue;
    }
    let event = ctx.args().get_as::<i64>("uevent").ok().and_then(InputEvent::from_raw);
    if event != Some(InputEvent::Pressed) {
        return Decision::Continue;
    }

    match state.sell_selected(&panel) {
        Ok(receipt) => tracing::info!("{}", receipt.message),
        Err(SaleError::Rejected(reason)) => tracing::debug!("Backpack sale rejected: {}", reason),
        Err(e) => tracing::warn!("Backpack sale failed: {}", e),
    }
    Decision::Continue
}

/// Register the sell mod's hooks and keybind on `dispatcher` and `keybinds`
pub fn build(
    services: Arc<HostServices>,
    dispatcher: Arc<Dispatcher>,
    keybinds: Arc<KeybindRegistry>,
    config: SellConfig,
) -> Result<(Mod, Arc<SellState>), ModError> {
    let sell_key = config.sell_key.clone();
    let state = Arc::new(SellState::new(services, Arc::clone(&keybinds), config));

    let weak: Weak<SellState> = Arc::downgrade(&state);
    let bind = keybinds.register_keybind("Sell Item", Some(sell_key.as_str()), move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        match state.sell_seen_pickup() {
            Ok(receipt) => tracing::info!("{}", receipt.message),
            Err(SaleError::Rejected(reason)) => tracing::debug!("Sale rejected: {}", reason),
            Err(e) => tracing::warn!("Sale failed: {}", e),
        }
    });
    // A fresh state always has an empty cell
    let _ = state.sell_bind.set(bind);

    let tooltip = MarkupMediation::new("sell_tooltip", Target::SetTooltipText, Target::ResolveMarkup)
        .install(&dispatcher, {
            let state = Arc::clone(&state);
            move |ctx: &CallContext<'_>| {
                let panel = ctx.receiver().cloned().map(InventoryPanel::from_handle)?;
                state.tooltip_hint(&panel)
            }
        });

    let hooks = [
        show_sell_prompt_register(&dispatcher, Arc::clone(&state)),
        release_weapon_swap_register(&dispatcher, Arc::clone(&state)),
        gate_weapon_swap_register(&dispatcher, Arc::clone(&state)),
        sell_from_backpack_register(&dispatcher, Arc::clone(&state)),
    ];

    let module = ModBuilder::new(MOD_NAME, dispatcher, keybinds)
        .description("Sell items from the ground or the backpack with a keybind")
        .hooks(hooks)
        .mediation(tooltip)
        .keybind(bind)
        .build()?;

    Ok((module, state))
}
