//! A scripted game for driving the mods without an engine

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use hookwork::{AutosaveConfig, Plugin, SellConfig, Target};
use hookwork_core::engine::{
    Audio, EngineObject, HostServices, Hud, ObjectHandle, ObjectSource, PropertyBag, Value,
};
use hookwork_core::hooks::{Arguments, Dispatcher, HookError};
use hookwork_core::sdk::targets::{OVERLAY_FONT, SELL_ICON_TEMPLATE, SELL_SOUND};
use hookwork_core::{CoreConfig, KeybindRegistry};

pub fn handle(bag: &Arc<PropertyBag>) -> ObjectHandle {
    ObjectHandle::from_arc(Arc::clone(bag) as Arc<dyn EngineObject>)
}

pub fn method_calls(bag: &PropertyBag) -> Vec<String> {
    bag.calls().into_iter().map(|(name, _)| name).collect()
}

#[derive(Default)]
pub struct RecordingHud {
    pub messages: Mutex<Vec<(String, String)>>,
}

impl Hud for RecordingHud {
    fn show_message(&self, title: &str, text: &str) {
        self.messages.lock().push((title.to_string(), text.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    pub events: Mutex<Vec<(ObjectHandle, ObjectHandle)>>,
}

impl Audio for RecordingAudio {
    fn play_event(&self, emitter: &ObjectHandle, event: &ObjectHandle) {
        self.events.lock().push((emitter.clone(), event.clone()));
    }
}

/// Snapshot of the default use icon, as the engine ships it
pub fn use_icon_snapshot() -> serde_json::Value {
    serde_json::json!({
        "$class": "InteractionIconDefinition",
        "Icon": 0,
        "Action": "USE",
        "Text": "PICK UP",
        "bHoldToUse": false,
    })
}

pub struct FakeObjects {
    pub controller: ObjectHandle,
    pub sell_sound: Arc<PropertyBag>,
    pub font: Arc<PropertyBag>,
    pub use_icon: ObjectHandle,
    /// Name of every object built from a template
    pub constructed: Mutex<Vec<String>>,
    pub refuse_construction: Mutex<bool>,
    pub lookups: Mutex<usize>,
}

impl ObjectSource for FakeObjects {
    fn find_object(&self, class: &str, name: &str) -> Option<ObjectHandle> {
        *self.lookups.lock() += 1;
        match (class, name) {
            c if c == SELL_SOUND => Some(handle(&self.sell_sound)),
            c if c == OVERLAY_FONT => Some(handle(&self.font)),
            c if c == SELL_ICON_TEMPLATE => Some(self.use_icon.clone()),
            _ => None,
        }
    }

    fn construct_from_template(&self, template: &ObjectHandle, name: &str) -> Option<ObjectHandle> {
        if *self.refuse_construction.lock() || !template.ptr_eq(&self.use_icon) {
            return None;
        }
        self.constructed.lock().push(name.to_string());
        PropertyBag::from_json(&use_icon_snapshot()).ok()
    }

    fn player_controller(&self) -> Option<ObjectHandle> {
        Some(self.controller.clone())
    }
}

/// Sellable item with the given class, value and mark
pub fn item(class: &str, value: i64, mark: i64) -> Arc<PropertyBag> {
    let clone_class = class.to_string();
    Arc::new(
        PropertyBag::new(class)
            .with_field("MonetaryValue", value)
            .with_method("GetMark", move |_, _| Ok(Value::Int(mark)))
            .with_method("CreateClone", move |bag, _| {
                Ok(Value::Object(
                    PropertyBag::new(clone_class.as_str())
                        .with_field("MonetaryValue", bag.field("MonetaryValue").unwrap_or_default())
                        .into_handle(),
                ))
            }),
    )
}

pub fn pickup(item: &Arc<PropertyBag>, pickupable: bool) -> Arc<PropertyBag> {
    Arc::new(
        PropertyBag::new("WillowPickup")
            .with_field("bPickupable", pickupable)
            .with_field("Inventory", handle(item)),
    )
}

/// Backpack panel with `selected` under the cursor
pub struct Backpack {
    pub panel: Arc<PropertyBag>,
    pub parent_movie: Arc<PropertyBag>,
    pub backpack_panel: Arc<PropertyBag>,
}

impl Backpack {
    pub fn new(selected: Option<&Arc<PropertyBag>>, equipped_view: bool) -> Self {
        let parent_movie = Arc::new(PropertyBag::new("WillowGFxMovie"));
        let backpack_panel = Arc::new(PropertyBag::new("WillowGFxListPanel"));
        let selected = Value::from(selected.map(handle));
        let panel = Arc::new(
            PropertyBag::new("StatusMenuInventoryPanelGFxObject")
                .with_field("bInEquippedView", equipped_view)
                .with_field("ParentMovie", handle(&parent_movie))
                .with_field("BackpackPanel", handle(&backpack_panel))
                .with_method("GetSelectedThing", move |_, _| Ok(selected.clone())),
        );
        Self {
            panel,
            parent_movie,
            backpack_panel,
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        handle(&self.panel)
    }
}

/// Host, player and both mods, all enabled
pub struct Game {
    pub hud: Arc<RecordingHud>,
    pub audio: Arc<RecordingAudio>,
    pub objects: Arc<FakeObjects>,
    pub dispatcher: Arc<Dispatcher>,
    pub keybinds: Arc<KeybindRegistry>,
    pub controller: Arc<PropertyBag>,
    pub manager: Arc<PropertyBag>,
    pub hud_movie: Arc<PropertyBag>,
    pub input: Arc<PropertyBag>,
    pub pawn: Arc<PropertyBag>,
    pub plugin: Plugin,
}

impl Game {
    pub fn new() -> Self {
        let manager = Arc::new(
            PropertyBag::new("WillowInventoryManager").with_field("BuyBackInventory", Vec::<Value>::new()),
        );
        let hud_movie = Arc::new(PropertyBag::new("WillowHUDGFxMovie"));
        let input = Arc::new(PropertyBag::new("WillowPlayerInput").with_field("bUsingGamepad", false));
        let pawn = Arc::new(PropertyBag::new("WillowPlayerPawn"));

        let (manager_handle, movie_handle) = (handle(&manager), handle(&hud_movie));
        let controller = Arc::new(
            PropertyBag::new("WillowPlayerController")
                .with_field("Role", 3)
                .with_field("CurrentSeenPickupable", Value::None)
                .with_field("Pawn", handle(&pawn))
                .with_field("PlayerInput", handle(&input))
                .with_method("GetPawnInventoryManager", move |_, _| {
                    Ok(Value::Object(manager_handle.clone()))
                })
                .with_method("GetHUDMovie", move |_, _| Ok(Value::Object(movie_handle.clone()))),
        );

        let hud = Arc::new(RecordingHud::default());
        let audio = Arc::new(RecordingAudio::default());
        let objects = Arc::new(FakeObjects {
            controller: handle(&controller),
            sell_sound: Arc::new(PropertyBag::new("AkEvent")),
            font: Arc::new(PropertyBag::new("Font")),
            use_icon: PropertyBag::from_json(&use_icon_snapshot()).unwrap(),
            constructed: Mutex::new(Vec::new()),
            refuse_construction: Mutex::new(false),
            lookups: Mutex::new(0),
        });
        let services = Arc::new(HostServices::new(
            Arc::clone(&hud) as Arc<dyn Hud>,
            Arc::clone(&audio) as Arc<dyn Audio>,
            Arc::clone(&objects) as Arc<dyn ObjectSource>,
        ));

        let dispatcher = Arc::new(Dispatcher::new());
        let keybinds = Arc::new(KeybindRegistry::new());
        for target in Target::ALL {
            dispatcher.install(target, |_| Ok(Value::None));
        }
        dispatcher.install(Target::CanSaveGame, |_| Ok(Value::Bool(true)));

        let plugin = Plugin::build(
            services,
            Arc::clone(&dispatcher),
            Arc::clone(&keybinds),
            SellConfig::default(),
            AutosaveConfig::default(),
        )
        .unwrap();
        plugin.apply(&CoreConfig::default()).unwrap();

        Self {
            hud,
            audio,
            objects,
            dispatcher,
            keybinds,
            controller,
            manager,
            hud_movie,
            input,
            pawn,
            plugin,
        }
    }

    pub fn use_gamepad(&self, on: bool) {
        self.input.insert("bUsingGamepad", on);
    }

    pub fn look_at(&self, pickup: &Arc<PropertyBag>) {
        self.controller.insert("CurrentSeenPickupable", handle(pickup));
    }

    pub fn dispatch(&self, target: Target, receiver: Option<ObjectHandle>, args: Arguments) -> Result<Value, HookError> {
        self.dispatcher.dispatch(target, receiver, args)
    }

    pub fn buyback(&self) -> Vec<Value> {
        self.manager
            .field("BuyBackInventory")
            .and_then(|v| v.as_list().map(<[Value]>::to_vec))
            .unwrap_or_default()
    }

    pub fn hud_messages(&self) -> Vec<(String, String)> {
        self.hud.messages.lock().clone()
    }
}
