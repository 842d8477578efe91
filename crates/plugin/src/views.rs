//! Typed views over the engine objects the mods touch

use std::marker::PhantomData;

use hookwork_engine::{EngineError, ObjectHandle, ObjectView, Value};
use hookwork_sdk::{ItemMark, NetRole};

/// The local player's controller
#[derive(hookwork_core::ObjectView)]
#[view(class = "WillowPlayerController")]
pub struct PlayerController {
    handle: ObjectHandle,

    #[view(field = "Role", readonly)]
    role: PhantomData<i64>,

    #[view(field = "CurrentSeenPickupable", readonly)]
    current_seen_pickupable: PhantomData<Option<ObjectHandle>>,

    #[view(field = "Pawn", readonly)]
    pawn: PhantomData<Option<ObjectHandle>>,
}

impl PlayerController {
    pub fn net_role(&self) -> Result<NetRole, EngineError> {
        Ok(NetRole::from_raw(self.role()?))
    }

    /// Missing input state reads as keyboard
    pub fn using_gamepad(&self) -> bool {
        self.handle
            .object("PlayerInput")
            .and_then(|input| input.get_as::<bool>("bUsingGamepad").ok())
            .unwrap_or(false)
    }

    pub fn seen_pickup(&self) -> Option<Pickup> {
        self.handle.object("CurrentSeenPickupable").map(Pickup::from_handle)
    }

    pub fn inventory_manager(&self) -> Result<Option<InventoryManager>, EngineError> {
        let manager: Option<ObjectHandle> = self.handle.call_as("GetPawnInventoryManager", &[])?;
        Ok(manager.map(InventoryManager::from_handle))
    }

    pub fn hud_movie(&self) -> Result<Option<ObjectHandle>, EngineError> {
        self.handle.call_as("GetHUDMovie", &[])
    }

    /// Credit money for a sold item
    pub fn player_sold_item(&self, amount: i64) -> Result<(), EngineError> {
        self.handle
            .call("PlayerSoldItem", &[Value::Int(0), Value::Int(amount)])?;
        Ok(())
    }
}

/// An item lying in the world
#[derive(hookwork_core::ObjectView)]
#[view(class = "WillowPickup")]
pub struct Pickup {
    handle: ObjectHandle,

    #[view(field = "bPickupable", readonly)]
    pickupable: PhantomData<bool>,

    #[view(field = "PickupShrinkDuration")]
    shrink_duration: PhantomData<f64>,
}

impl Pickup {
    pub fn inventory(&self) -> Option<Inventory> {
        self.handle.object("Inventory").map(Inventory::from_handle)
    }

    /// Stop the pickup being collected and shrink it away
    pub fn dispose(&self, shrink_duration: f64) -> Result<(), EngineError> {
        self.handle.call("SetPickupability", &[Value::Bool(false)])?;
        self.set_shrink_duration(shrink_duration)?;
        self.handle.call("BeginShrinking", &[])?;
        Ok(())
    }
}

/// An inventory item, in the world or in the backpack
///
/// Item classes vary (weapons, shields, usable items), so the view is
/// always built unchecked.
#[derive(hookwork_core::ObjectView)]
#[view(class = "WillowInventory")]
pub struct Inventory {
    handle: ObjectHandle,

    #[view(field = "MonetaryValue", readonly)]
    raw_value: PhantomData<i64>,
}

impl Inventory {
    pub fn class_name(&self) -> &str {
        self.handle.class_name()
    }

    /// Sell value, preferring the engine's computed value over the raw field
    pub fn monetary_value(&self) -> Result<i64, EngineError> {
        match self.handle.call("GetMonetaryValue", &[])? {
            Value::Int(value) => Ok(value),
            _ => self.raw_value(),
        }
    }

    /// Items without a mark read as standard
    pub fn mark(&self) -> Result<ItemMark, EngineError> {
        match self.handle.call("GetMark", &[])? {
            Value::Int(raw) => Ok(ItemMark::from_raw(raw)),
            _ => Ok(ItemMark::Standard),
        }
    }

    pub fn create_clone(&self) -> Result<ObjectHandle, EngineError> {
        self.handle.call_as("CreateClone", &[])
    }
}

/// The pawn's inventory manager
#[derive(hookwork_core::ObjectView)]
#[view(class = "WillowInventoryManager")]
pub struct InventoryManager {
    handle: ObjectHandle,

    #[view(field = "BuyBackInventory")]
    buy_back_inventory: PhantomData<Vec<Value>>,
}

impl InventoryManager {
    pub fn remove_from_backpack(&self, item: &Inventory) -> Result<(), EngineError> {
        self.handle
            .call("RemoveInventoryFromBackpack", &[Value::Object(item.handle().clone())])?;
        self.handle.call("UpdateBackpackInventoryCount", &[])?;
        Ok(())
    }

    pub fn increment_pickup_stats(&self, item: &Inventory) -> Result<(), EngineError> {
        self.handle.call(
            "ClientConditionalIncrementPickupStats",
            &[Value::Object(item.handle().clone())],
        )?;
        Ok(())
    }
}

/// Backpack screen of the status menu
#[derive(hookwork_core::ObjectView)]
#[view(class = "StatusMenuInventoryPanelGFxObject")]
pub struct InventoryPanel {
    handle: ObjectHandle,

    #[view(field = "bInEquippedView", readonly)]
    in_equipped_view: PhantomData<bool>,
}

impl InventoryPanel {
    /// Missing flag reads as backpack view
    pub fn is_equipped_view(&self) -> bool {
        self.in_equipped_view().unwrap_or(false)
    }

    pub fn selected_item(&self) -> Result<Option<Inventory>, EngineError> {
        let selected: Option<ObjectHandle> = self.handle.call_as("GetSelectedThing", &[])?;
        Ok(selected.map(Inventory::from_handle))
    }

    pub fn parent_movie(&self) -> Option<ObjectHandle> {
        self.handle.object("ParentMovie")
    }

    pub fn backpack_panel(&self) -> Option<ObjectHandle> {
        self.handle.object("BackpackPanel")
    }

    /// Flash a short text over the item card
    pub fn flourish(&self, text: &str) -> Result<(), EngineError> {
        self.handle.call("FlourishEquip", &[Value::from(text)])?;
        Ok(())
    }

    pub fn play_failure_sound(&self) -> Result<(), EngineError> {
        if let Some(movie) = self.parent_movie() {
            movie.call("PlayUISound", &[Value::from("ResultFailure")])?;
        }
        Ok(())
    }
}

/// Viewport drawing surface handed to PostRender
#[derive(hookwork_core::ObjectView)]
#[view(class = "Canvas")]
pub struct Canvas {
    handle: ObjectHandle,

    #[view(field = "SizeX", readonly)]
    size_x: PhantomData<f64>,

    #[view(field = "Font")]
    font: PhantomData<ObjectHandle>,
}

impl Canvas {
    pub fn set_pos(&self, x: f64, y: f64) -> Result<(), EngineError> {
        self.handle
            .call("SetPos", &[Value::Float(x), Value::Float(y), Value::Float(0.0)])?;
        Ok(())
    }

    pub fn set_draw_color(&self, color: ObjectHandle) -> Result<(), EngineError> {
        self.handle.call("SetDrawColorStruct", &[Value::Object(color)])?;
        Ok(())
    }

    pub fn draw_text(&self, text: &str, scale: f64) -> Result<(), EngineError> {
        self.handle.call(
            "DrawText",
            &[
                Value::from(text),
                Value::Bool(false),
                Value::Float(scale),
                Value::Float(scale),
            ],
        )?;
        Ok(())
    }
}
