mod common;

use common::Game;
use hookwork::{autosave, sell, SellConfig, Target};
use hookwork_core::config::PluginConfig;
use hookwork_core::hooks::Arguments;
use hookwork_core::sdk::InputEvent;
use hookwork_core::engine::Value;
use hookwork_core::CoreConfig;

#[test]
fn test_core_config_disables_mods() {
    let game = Game::new();
    let core = CoreConfig {
        disabled_mods: vec![autosave::MOD_NAME.to_string()],
        ..CoreConfig::default()
    };
    game.plugin.apply(&core).unwrap();

    assert!(game.plugin.sell.is_enabled());
    assert!(!game.plugin.autosave.is_enabled());
    assert_eq!(game.keybinds.dispatch_key_press("F2", InputEvent::Pressed), 0);
    assert_eq!(
        game.dispatch(Target::CanSaveGame, None, Arguments::new()).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_mod_names() {
    let game = Game::new();
    let names: Vec<&str> = game.plugin.mods().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec![sell::MOD_NAME, autosave::MOD_NAME]);
}

#[test]
fn test_unload_removes_everything() {
    let Game {
        plugin,
        dispatcher,
        keybinds,
        ..
    } = Game::new();
    let sell_bind = plugin.sell_state.sell_bind().unwrap();

    plugin.unload().unwrap();

    assert!(keybinds.get(sell_bind).is_none());
    assert_eq!(keybinds.dispatch_key_press("F2", InputEvent::Pressed), 0);
    for target in Target::ALL {
        assert!(dispatcher.lookup(&target.into(), hookwork_core::Phase::Before).is_empty());
    }
}

#[test]
fn test_sell_config_written_on_first_load() {
    let dir = std::env::temp_dir().join(format!("hookwork-plugin-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let config = SellConfig::load_in(&dir).unwrap();
    assert_eq!(config, SellConfig::default());
    assert!(dir.join("plugins/sell/sell.toml").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
