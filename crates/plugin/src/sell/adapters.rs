//! Engine-backed implementations of the sale capability traits

use hookwork_core::engine::{EngineError, HostServices, ObjectView, Value};
use hookwork_core::sdk::targets::SELL_SOUND;
use hookwork_core::sdk::ItemMark;
use hookwork_core::{BuybackCache, SaleFeedback, SaleLedger, SaleSource, Sellable};

use crate::views::{Inventory, InventoryManager, InventoryPanel, Pickup, PlayerController};

/// Where a [`SaleItem`] currently sits
pub enum Origin<'a> {
    World(Pickup),
    Backpack(&'a InventoryPanel),
}

/// An inventory item offered for sale
pub struct SaleItem<'a> {
    pub inventory: Inventory,
    pub origin: Origin<'a>,
}

impl<'a> SaleItem<'a> {
    /// The item lying inside `pickup`, if any
    pub fn world(pickup: Pickup) -> Option<Self> {
        let inventory = pickup.inventory()?;
        Some(Self {
            inventory,
            origin: Origin::World(pickup),
        })
    }

    pub fn backpack(inventory: Inventory, panel: &'a InventoryPanel) -> Self {
        Self {
            inventory,
            origin: Origin::Backpack(panel),
        }
    }
}

impl Sellable for SaleItem<'_> {
    fn class_tag(&self) -> Result<String, EngineError> {
        Ok(self.inventory.class_name().to_string())
    }

    fn monetary_value(&self) -> Result<i64, EngineError> {
        self.inventory.monetary_value()
    }

    fn is_pickupable(&self) -> Result<bool, EngineError> {
        match &self.origin {
            Origin::World(pickup) => pickup.pickupable(),
            Origin::Backpack(_) => Ok(true),
        }
    }

    fn is_equipped(&self) -> Result<bool, EngineError> {
        match &self.origin {
            Origin::World(_) => Ok(false),
            Origin::Backpack(panel) => Ok(panel.is_equipped_view()),
        }
    }

    fn mark(&self) -> Result<ItemMark, EngineError> {
        self.inventory.mark()
    }
}

/// Money, inventory and buyback effects of a sale
pub struct EngineLedger<'a> {
    pub controller: &'a PlayerController,
    pub manager: &'a InventoryManager,
    pub shrink_duration: f64,
    pub buyback_capacity: usize,
}

impl<'i> SaleLedger<SaleItem<'i>> for EngineLedger<'_> {
    fn credit(&mut self, amount: i64) -> Result<(), EngineError> {
        self.controller.player_sold_item(amount)
    }

    fn remove(&mut self, item: &SaleItem<'i>, _source: SaleSource) -> Result<(), EngineError> {
        match &item.origin {
            Origin::World(pickup) => pickup.dispose(self.shrink_duration),
            Origin::Backpack(panel) => {
                // Keep the cursor on the same slot across the refresh
                let backpack = panel.backpack_panel();
                if let Some(backpack) = &backpack {
                    backpack.call("SaveState", &[])?;
                }
                self.manager.remove_from_backpack(&item.inventory)?;
                if let Some(movie) = panel.parent_movie() {
                    movie.call("RefreshInventoryScreen", &[Value::Bool(true)])?;
                }
                if let Some(backpack) = &backpack {
                    backpack.call("RestoreState", &[])?;
                }
                Ok(())
            }
        }
    }

    fn record_pickup_stats(&mut self, item: &SaleItem<'i>, _source: SaleSource) -> Result<(), EngineError> {
        match item.origin {
            Origin::World(_) => self.manager.increment_pickup_stats(&item.inventory),
            Origin::Backpack(_) => Ok(()),
        }
    }

    fn record_buyback(&mut self, item: &SaleItem<'i>) -> Result<(), EngineError> {
        // A manager without the field has no history yet; anything else
        // unreadable must not be overwritten
        let history = match self.manager.buy_back_inventory() {
            Ok(history) => history,
            Err(EngineError::MissingField { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        let clone = item.inventory.create_clone()?;

        let mut cache = BuybackCache::from_entries(history, self.buyback_capacity);
        cache.record(Value::Object(clone));
        self.manager.set_buy_back_inventory(cache.into_vec())
    }
}

/// Sell sound plus a HUD message (world) or item card flourish (backpack)
pub struct HostFeedback<'a> {
    pub services: &'a HostServices,
    pub controller: &'a PlayerController,
    pub title: &'a str,
    pub panel: Option<&'a InventoryPanel>,
}

impl SaleFeedback for HostFeedback<'_> {
    fn play_sell_sound(&self) {
        let Some(pawn) = self.controller.handle().object("Pawn") else {
            return;
        };
        let (class, name) = SELL_SOUND;
        match self.services.resolve(class, name) {
            Ok(sound) => self.services.audio.play_event(&pawn, &sound),
            Err(e) => tracing::warn!("Sell sound unavailable: {}", e),
        }
    }

    fn show_message(&self, text: &str) {
        match self.panel {
            Some(panel) => {
                if let Err(e) = panel.flourish(text) {
                    tracing::warn!("Failed to flourish sale: {}", e);
                }
            }
            None => self.services.hud.show_message(self.title, text),
        }
    }
}
