mod common;

use std::sync::{Arc, Weak};

use common::{handle, item, method_calls, pickup, Backpack, Game};
use hookwork::Target;
use hookwork_core::engine::{EngineError, ObjectFlags, Value};
use hookwork_core::hooks::{Arguments, Dispatcher};
use hookwork_core::sdk::input::GAMEPAD_START_MARKUP;
use hookwork_core::sdk::InputEvent;
use hookwork_core::{SaleError, SaleRejected, DEFAULT_BUYBACK_CAPACITY};

fn press(game: &Game, key: &str) -> usize {
    game.keybinds.dispatch_key_press(key, InputEvent::Pressed)
}

fn key_input(key: &str, event: InputEvent) -> Arguments {
    Arguments::new().with("ukey", key).with("uevent", event as i64)
}

#[test]
fn test_world_sale_applies_every_effect() {
    let game = Game::new();
    let gun = item("WillowWeapon", 150, 0);
    let ground = pickup(&gun, true);
    game.look_at(&ground);

    assert_eq!(press(&game, "Backslash"), 1);

    assert_eq!(
        game.controller.calls_to("PlayerSoldItem"),
        vec![vec![Value::Int(0), Value::Int(150)]]
    );
    assert_eq!(method_calls(&ground), vec!["SetPickupability", "BeginShrinking"]);
    assert_eq!(ground.field("PickupShrinkDuration"), Some(Value::Float(0.5)));
    assert_eq!(
        game.manager.calls_to("ClientConditionalIncrementPickupStats"),
        vec![vec![Value::Object(handle(&gun))]]
    );

    let buyback = game.buyback();
    assert_eq!(buyback.len(), 1);
    let clone = buyback[0].as_object().unwrap();
    assert_ne!(*clone, handle(&gun));
    assert_eq!(clone.get_as::<i64>("MonetaryValue").unwrap(), 150);

    let events = game.audio.events.lock().clone();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, handle(&game.pawn));
    assert!(events[0].1.flags().contains(ObjectFlags::KEEP_ALIVE));

    let messages = game.hud_messages();
    assert_eq!(
        messages,
        vec![("Cleaning Up Pandora+".to_string(), "Sold for $150".to_string())]
    );
    assert!(messages[0].1.contains("150"));
}

#[test]
fn test_sell_sound_resolved_once() {
    let game = Game::new();
    for value in [10, 20] {
        let ground = pickup(&item("WillowWeapon", value, 0), true);
        game.look_at(&ground);
        press(&game, "Backslash");
    }
    assert_eq!(game.audio.events.lock().len(), 2);
    assert_eq!(*game.objects.lookups.lock(), 1);
}

#[test]
fn test_client_cannot_sell() {
    let game = Game::new();
    game.controller.insert("Role", 1);
    let ground = pickup(&item("WillowWeapon", 150, 0), true);
    game.look_at(&ground);

    let err = game.plugin.sell_state.sell_seen_pickup().unwrap_err();
    assert_eq!(err.rejection(), Some(&SaleRejected::NotAuthority));
    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());
    assert!(method_calls(&ground).is_empty());
    assert!(game.buyback().is_empty());
    assert!(game.hud_messages().is_empty());
}

#[test]
fn test_unsellable_pickups_are_left_alone() {
    let game = Game::new();

    let mission = pickup(&item("WillowMissionItem", 500, 0), true);
    game.look_at(&mission);
    let err = game.plugin.sell_state.sell_seen_pickup().unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&SaleRejected::ExcludedType("WillowMissionItem".into()))
    );

    let shrinking = pickup(&item("WillowWeapon", 500, 0), false);
    game.look_at(&shrinking);
    let err = game.plugin.sell_state.sell_seen_pickup().unwrap_err();
    assert_eq!(err.rejection(), Some(&SaleRejected::NotPickupable));

    game.controller.insert("CurrentSeenPickupable", Value::None);
    let err = game.plugin.sell_state.sell_seen_pickup().unwrap_err();
    assert_eq!(err.rejection(), Some(&SaleRejected::NothingSelected));

    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());
    assert!(game.buyback().is_empty());
}

#[test]
fn test_buyback_keeps_newest_entries() {
    let game = Game::new();
    let history: Vec<Value> = (0..DEFAULT_BUYBACK_CAPACITY as i64).map(Value::Int).collect();
    game.manager.insert("BuyBackInventory", history);

    game.look_at(&pickup(&item("WillowWeapon", 75, 0), true));
    press(&game, "Backslash");

    let buyback = game.buyback();
    assert_eq!(buyback.len(), DEFAULT_BUYBACK_CAPACITY);
    assert_eq!(buyback[0], Value::Int(1));
    assert_eq!(
        buyback.last().and_then(Value::as_object).map(|o| o.get_as::<i64>("MonetaryValue").unwrap()),
        Some(75)
    );
}

#[test]
fn test_unreadable_buyback_history_is_kept() {
    let game = Game::new();
    game.manager.insert("BuyBackInventory", "corrupt");
    game.look_at(&pickup(&item("WillowWeapon", 150, 0), true));

    let err = game.plugin.sell_state.sell_seen_pickup().unwrap_err();
    assert!(matches!(err, SaleError::Engine(EngineError::TypeMismatch { .. })));
    assert_eq!(game.manager.field("BuyBackInventory"), Some(Value::from("corrupt")));
    assert!(game.hud_messages().is_empty());
}

#[test]
fn test_missing_buyback_history_starts_fresh() {
    let game = Game::new();
    game.manager.remove("BuyBackInventory");
    game.look_at(&pickup(&item("WillowWeapon", 150, 0), true));

    game.plugin.sell_state.sell_seen_pickup().unwrap();
    assert_eq!(game.buyback().len(), 1);
}

#[test]
fn test_rebound_key_sells() {
    let game = Game::new();
    let bind = game.plugin.sell_state.sell_bind().unwrap();
    game.keybinds.rebind(bind, Some("K")).unwrap();
    game.look_at(&pickup(&item("WillowWeapon", 10, 0), true));

    assert_eq!(press(&game, "Backslash"), 0);
    assert_eq!(press(&game, "K"), 1);
    assert_eq!(game.controller.calls_to("PlayerSoldItem").len(), 1);
}

#[test]
fn test_backpack_sale() {
    let game = Game::new();
    let shield = item("WillowShield", 1500, 0);
    let backpack = Backpack::new(Some(&shield), false);

    let result = game
        .dispatch(
            Target::BackpackInputKey,
            Some(backpack.handle()),
            key_input("Backslash", InputEvent::Pressed),
        )
        .unwrap();
    assert_eq!(result, Value::None);

    assert_eq!(
        game.controller.calls_to("PlayerSoldItem"),
        vec![vec![Value::Int(0), Value::Int(1500)]]
    );
    assert_eq!(
        method_calls(&game.manager),
        vec!["RemoveInventoryFromBackpack", "UpdateBackpackInventoryCount"]
    );
    assert!(game.manager.calls_to("ClientConditionalIncrementPickupStats").is_empty());
    assert_eq!(method_calls(&backpack.backpack_panel), vec!["SaveState", "RestoreState"]);
    assert_eq!(
        backpack.parent_movie.calls_to("RefreshInventoryScreen"),
        vec![vec![Value::Bool(true)]]
    );
    assert_eq!(
        backpack.panel.calls_to("FlourishEquip"),
        vec![vec![Value::from("+$1,500")]]
    );
    assert_eq!(game.buyback().len(), 1);
    assert_eq!(game.audio.events.lock().len(), 1);
    assert!(game.hud_messages().is_empty());
}

#[test]
fn test_backpack_refuses_favorited_and_equipped() {
    let game = Game::new();

    let favorite = item("WillowWeapon", 900, 2);
    let backpack = Backpack::new(Some(&favorite), false);
    game.dispatch(
        Target::BackpackInputKey,
        Some(backpack.handle()),
        key_input("Backslash", InputEvent::Pressed),
    )
    .unwrap();
    assert_eq!(
        backpack.parent_movie.calls_to("PlayUISound"),
        vec![vec![Value::from("ResultFailure")]]
    );
    assert_eq!(
        backpack.panel.calls_to("FlourishEquip"),
        vec![vec![Value::from("Error: Item is favorited.")]]
    );

    let equipped = Backpack::new(Some(&item("WillowWeapon", 900, 0)), true);
    game.dispatch(
        Target::BackpackInputKey,
        Some(equipped.handle()),
        key_input("Backslash", InputEvent::Pressed),
    )
    .unwrap();
    assert_eq!(
        equipped.panel.calls_to("FlourishEquip"),
        vec![vec![Value::from("Error: Item is equipped.")]]
    );

    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());
    assert!(game.manager.calls().is_empty());
    assert!(game.buyback().is_empty());
    assert!(game.audio.events.lock().is_empty());
}

#[test]
fn test_backpack_ignores_other_input() {
    let game = Game::new();
    let backpack = Backpack::new(Some(&item("WillowWeapon", 10, 0)), false);

    for args in [
        key_input("E", InputEvent::Pressed),
        key_input("Backslash", InputEvent::Released),
        key_input("Backslash", InputEvent::Repeat),
    ] {
        game.dispatch(Target::BackpackInputKey, Some(backpack.handle()), args)
            .unwrap();
    }

    assert!(backpack.panel.calls().is_empty());
    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());
}

#[test]
fn test_backpack_gamepad_uses_start() {
    let game = Game::new();
    game.use_gamepad(true);
    let backpack = Backpack::new(Some(&item("WillowWeapon", 10, 0)), false);

    game.dispatch(
        Target::BackpackInputKey,
        Some(backpack.handle()),
        key_input("Backslash", InputEvent::Pressed),
    )
    .unwrap();
    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());

    game.dispatch(
        Target::BackpackInputKey,
        Some(backpack.handle()),
        key_input("XboxTypeS_Start", InputEvent::Pressed),
    )
    .unwrap();
    assert_eq!(game.controller.calls_to("PlayerSoldItem").len(), 1);
}

#[test]
fn test_sell_prompt() {
    let game = Game::new();
    let ground = pickup(&item("WillowWeapon", 10, 0), true);

    game.dispatch(
        Target::SawPickupable,
        Some(handle(&game.controller)),
        Arguments::new().with("Pickup", handle(&ground)),
    )
    .unwrap();

    let shown = game.hud_movie.calls_to("ShowToolTip");
    assert_eq!(shown.len(), 1);
    let prompt = shown[0][0].as_object().unwrap();
    let icon = prompt.object("IconDef").unwrap();
    assert_eq!(icon.get_as::<String>("Text").unwrap(), "[Backslash] SELL ITEM");
    assert_eq!(icon.get_as::<i64>("Icon").unwrap(), 4);
    assert_eq!(icon.get_as::<String>("Action").unwrap(), "");
    assert!(game.plugin.sell_state.can_swap());

    // Copied from the default use icon, which itself stays untouched
    assert!(!icon.get_as::<bool>("bHoldToUse").unwrap());
    assert!(icon.flags().contains(ObjectFlags::KEEP_ALIVE));
    assert!(!icon.ptr_eq(&game.objects.use_icon));
    assert_eq!(game.objects.use_icon.get_as::<String>("Text").unwrap(), "PICK UP");
    assert_eq!(*game.objects.constructed.lock(), vec!["SecondaryUse".to_string()]);
}

#[test]
fn test_no_prompt_when_icon_cannot_be_built() {
    let game = Game::new();
    *game.objects.refuse_construction.lock() = true;
    let ground = pickup(&item("WillowWeapon", 10, 0), true);

    game.dispatch(
        Target::SawPickupable,
        Some(handle(&game.controller)),
        Arguments::new().with("Pickup", handle(&ground)),
    )
    .unwrap();
    assert!(game.hud_movie.calls_to("ShowToolTip").is_empty());
}

#[test]
fn test_no_prompt_for_mission_items_or_without_hud() {
    let game = Game::new();
    let mission = pickup(&item("WillowUsableItem", 10, 0), true);
    game.dispatch(
        Target::SawPickupable,
        Some(handle(&game.controller)),
        Arguments::new().with("Pickup", handle(&mission)),
    )
    .unwrap();
    assert!(game.hud_movie.calls().is_empty());

    let no_hud = Arc::new(
        hookwork_core::engine::PropertyBag::new("WillowPlayerController")
            .with_field("Role", 3),
    );
    let ground = pickup(&item("WillowWeapon", 10, 0), true);
    game.dispatch(
        Target::SawPickupable,
        Some(handle(&no_hud)),
        Arguments::new().with("Pickup", handle(&ground)),
    )
    .unwrap();
    assert_eq!(method_calls(&no_hud), vec!["GetHUDMovie"]);
}

#[test]
fn test_gamepad_swap_lock() {
    let game = Game::new();
    game.use_gamepad(true);
    let swaps = Arc::new(parking_lot::Mutex::new(0));
    let counter = Arc::clone(&swaps);
    game.dispatcher.install(Target::NextWeapon, move |_| {
        *counter.lock() += 1;
        Ok(Value::None)
    });

    let ground = pickup(&item("WillowWeapon", 10, 0), true);
    game.dispatch(
        Target::SawPickupable,
        Some(handle(&game.controller)),
        Arguments::new().with("Pickup", handle(&ground)),
    )
    .unwrap();
    assert!(!game.plugin.sell_state.can_swap());

    game.dispatch(Target::NextWeapon, None, Arguments::new()).unwrap();
    assert_eq!(*swaps.lock(), 0);

    game.dispatch(Target::ClearSeenPickupable, None, Arguments::new()).unwrap();
    game.dispatch(Target::NextWeapon, None, Arguments::new()).unwrap();
    assert_eq!(*swaps.lock(), 1);
}

/// Tooltip original that resolves its markup through a nested dispatch
fn install_tooltip(dispatcher: &Arc<Dispatcher>, markup: &'static str) -> Arc<parking_lot::Mutex<Vec<String>>> {
    let shown = Arc::new(parking_lot::Mutex::new(Vec::new()));

    dispatcher.install(Target::ResolveMarkup, |invocation| {
        Ok(invocation.args.get("Markup").cloned().unwrap_or_default())
    });

    let weak: Weak<Dispatcher> = Arc::downgrade(dispatcher);
    let record = Arc::clone(&shown);
    dispatcher.install(Target::SetTooltipText, move |invocation| {
        let dispatcher = weak.upgrade().ok_or(EngineError::HostNotInitialized)?;
        let resolved = dispatcher
            .dispatch(
                Target::ResolveMarkup,
                invocation.receiver.clone(),
                Arguments::new().with("Markup", markup),
            )
            .map_err(|e| EngineError::MethodFailed {
                class: "GFxMoviePlayer".into(),
                method: "ResolveDataStoreMarkup".into(),
                reason: e.to_string(),
            })?;
        record.lock().push(resolved.as_str().unwrap_or_default().to_string());
        Ok(Value::None)
    });
    shown
}

#[test]
fn test_backpack_tooltip_gets_sell_hint() {
    let game = Game::new();
    let shown = install_tooltip(&game.dispatcher, "[E] Equip");
    let backpack = Backpack::new(None, false);

    game.dispatch(Target::SetTooltipText, Some(backpack.handle()), Arguments::new())
        .unwrap();
    assert_eq!(shown.lock().clone(), vec!["[E] Equip\n[Backslash] Sell Item"]);

    // Outside the tooltip the markup is untouched
    let plain = game
        .dispatch(
            Target::ResolveMarkup,
            None,
            Arguments::new().with("Markup", "Quest log"),
        )
        .unwrap();
    assert_eq!(plain, Value::from("Quest log"));
}

#[test]
fn test_tooltip_hint_joins_existing_lines() {
    let game = Game::new();
    game.use_gamepad(true);
    let shown = install_tooltip(&game.dispatcher, "[E] Equip\n[Q] Drop");
    let backpack = Backpack::new(None, false);

    game.dispatch(Target::SetTooltipText, Some(backpack.handle()), Arguments::new())
        .unwrap();
    assert_eq!(
        shown.lock().clone(),
        vec![format!("[E] Equip\n[Q] Drop    {GAMEPAD_START_MARKUP} Sell Item")]
    );
}

#[test]
fn test_no_tooltip_hint_in_equipped_view() {
    let game = Game::new();
    let shown = install_tooltip(&game.dispatcher, "[E] Unequip");
    let equipped = Backpack::new(None, true);

    game.dispatch(Target::SetTooltipText, Some(equipped.handle()), Arguments::new())
        .unwrap();
    assert_eq!(shown.lock().clone(), vec!["[E] Unequip"]);
}

#[test]
fn test_disabled_mod_is_inert() {
    let game = Game::new();
    game.plugin.sell.disable().unwrap();
    let shown = install_tooltip(&game.dispatcher, "[E] Equip");

    game.look_at(&pickup(&item("WillowWeapon", 10, 0), true));
    assert_eq!(press(&game, "Backslash"), 0);

    let backpack = Backpack::new(None, false);
    game.dispatch(Target::SetTooltipText, Some(backpack.handle()), Arguments::new())
        .unwrap();
    assert_eq!(shown.lock().clone(), vec!["[E] Equip"]);
    assert!(game.controller.calls_to("PlayerSoldItem").is_empty());
}
