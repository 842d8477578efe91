//! AutoSave Blocker
//!
//! `CanSaveGame` is always answered by the mod: saving is allowed unless
//! blocking is switched on with the toggle keybind. The current state is
//! drawn on the viewport while "Enable Text" is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use hookwork_core::engine::{EngineError, HostServices, ObjectView, PropertyBag};
use hookwork_core::hooks::{CallContext, Decision, Dispatcher, HookKey};
use hookwork_core::sdk::targets::OVERLAY_FONT;
use hookwork_core::{hook, BoolOption, KeybindRegistry, Mod, ModBuilder, ModError, OptionGroup, SliderOption};

use crate::config::{AutosaveConfig, TextSettings};
use crate::targets::Target;
use crate::views::Canvas;

pub const MOD_NAME: &str = "AutoSave Blocker";

const MESSAGE_TITLE: &str = "[AutoSave Blocker]";

/// Sliders of the "Text Settings" group
pub struct TextOptions {
    pub red: Arc<SliderOption>,
    pub green: Arc<SliderOption>,
    pub blue: Arc<SliderOption>,
    pub alpha: Arc<SliderOption>,
    pub x: Arc<SliderOption>,
    pub y: Arc<SliderOption>,
    pub size: Arc<SliderOption>,
    group: OptionGroup,
}

fn slider(name: &str, value: i64, min: i64, max: i64, default: i64) -> Arc<SliderOption> {
    let option = SliderOption::new(name, default, "").with_range(min, max);
    option.set_silent(value);
    Arc::new(option)
}

impl TextOptions {
    pub fn new(settings: &TextSettings) -> Self {
        let defaults = TextSettings::default();
        let red = slider("Red", settings.red, 0, 255, defaults.red);
        let green = slider("Green", settings.green, 0, 255, defaults.green);
        let blue = slider("Blue", settings.blue, 0, 255, defaults.blue);
        let alpha = slider("Alpha", settings.alpha, 0, 255, defaults.alpha);
        let x = slider("X", settings.x, 0, 1000, defaults.x);
        let y = slider("Y", settings.y, 0, 1000, defaults.y);
        let size = slider("Size", settings.size, 50, 150, defaults.size);

        let group = OptionGroup::new("Text Settings")
            .with(Arc::clone(&red))
            .with(Arc::clone(&green))
            .with(Arc::clone(&blue))
            .with(Arc::clone(&alpha))
            .with(Arc::clone(&x))
            .with(Arc::clone(&y))
            .with(Arc::clone(&size));

        Self {
            red,
            green,
            blue,
            alpha,
            x,
            y,
            size,
            group,
        }
    }

    pub fn group(&self) -> &OptionGroup {
        &self.group
    }
}

/// Shared state of the blocker's hooks, keybind and options
pub struct AutosaveState {
    services: Arc<HostServices>,
    dispatcher: Weak<Dispatcher>,
    blocking: AtomicBool,
    mod_enabled: AtomicBool,
    overlay: OnceLock<HookKey>,
    pub text: TextOptions,
    pub show_text: BoolOption,
}

impl AutosaveState {
    fn new(services: Arc<HostServices>, dispatcher: &Arc<Dispatcher>, config: &AutosaveConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let show_text = BoolOption::new("Enable Text", true, "Draw the blocking state on screen")
                .with_on_change(move |_, show| {
                    if let Some(state) = weak.upgrade() {
                        state.set_overlay(*show);
                    }
                });
            show_text.set_silent(config.show_text);

            Self {
                services,
                dispatcher: Arc::downgrade(dispatcher),
                blocking: AtomicBool::new(false),
                mod_enabled: AtomicBool::new(false),
                overlay: OnceLock::new(),
                text: TextOptions::new(&config.text),
                show_text,
            }
        })
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking.load(Ordering::Acquire)
    }

    /// Flip blocking and announce the new state
    pub fn toggle(&self) -> bool {
        let blocking = !self.blocking.fetch_xor(true, Ordering::AcqRel);
        self.services
            .hud
            .show_message(MESSAGE_TITLE, &format!("Set to {blocking}"));
        blocking
    }

    pub fn overlay_hook(&self) -> Option<HookKey> {
        self.overlay.get().copied()
    }

    /// Switch the overlay hook, only while the mod is enabled
    fn set_overlay(&self, on: bool) {
        if !self.mod_enabled.load(Ordering::Acquire) {
            return;
        }
        let (Some(dispatcher), Some(key)) = (self.dispatcher.upgrade(), self.overlay_hook()) else {
            return;
        };
        let result = if on {
            dispatcher.enable(key)
        } else {
            dispatcher.disable(key)
        };
        if let Err(e) = result {
            tracing::warn!("Failed to switch autosave overlay: {}", e);
        }
    }

    fn on_enable(&self) {
        self.mod_enabled.store(true, Ordering::Release);
        self.set_overlay(self.show_text.get());
    }

    fn on_disable(&self) {
        self.mod_enabled.store(false, Ordering::Release);
    }

    /// Overlay text at (x, y) thousandths of the canvas width
    fn draw(&self, canvas: &Canvas) -> Result<(), EngineError> {
        let (class, name) = OVERLAY_FONT;
        match self.services.resolve(class, name) {
            Ok(font) => canvas.set_font(font)?,
            Err(e) => tracing::trace!("Overlay font unavailable: {}", e),
        }

        let width = canvas.size_x()?;
        let x = width * (self.text.x.get() as f64 / 1000.0);
        let y = width * (self.text.y.get() as f64 / 1000.0);
        canvas.set_pos(x, y)?;

        let color = PropertyBag::new("Color")
            .with_field("R", self.text.red.get())
            .with_field("G", self.text.green.get())
            .with_field("B", self.text.blue.get())
            .with_field("A", self.text.alpha.get())
            .into_handle();
        canvas.set_draw_color(color)?;

        let scale = self.text.size.get() as f64 / 100.0;
        canvas.draw_text(&format!("AutoSave Blocking: {}", self.is_blocking()), scale)
    }
}

#[hook(Target::CanSaveGame)]
fn gate_saving(state: &AutosaveState, _ctx: &mut CallContext) -> Decision {
    Decision::block(!state.is_blocking())
}

#[hook(Target::PostRender, disabled)]
fn draw_overlay(state: &AutosaveState, ctx: &mut CallContext) -> Decision {
    let Some(canvas) = ctx.args().object("Canvas").cloned().map(Canvas::from_handle) else {
        return Decision::Continue;
    };
    if let Err(e) = state.draw(&canvas) {
        tracing::warn!("Failed to draw autosave overlay: {}", e);
    }
    Decision::Continue
}

/// Register the blocker's hooks and keybind
pub fn build(
    services: Arc<HostServices>,
    dispatcher: Arc<Dispatcher>,
    keybinds: Arc<KeybindRegistry>,
    config: AutosaveConfig,
) -> Result<(Mod, Arc<AutosaveState>), ModError> {
    let state = AutosaveState::new(services, &dispatcher, &config);

    let gate = gate_saving_register(&dispatcher, Arc::clone(&state));
    let overlay = draw_overlay_register(&dispatcher, Arc::clone(&state));
    // A fresh state always has an empty cell
    let _ = state.overlay.set(overlay);

    let weak = Arc::downgrade(&state);
    let bind = keybinds.register_keybind("Toggle AutoSave Blocker", Some(config.toggle_key.as_str()), move || {
        if let Some(state) = weak.upgrade() {
            state.toggle();
        }
    });

    let (on_enable, on_disable) = (Arc::downgrade(&state), Arc::downgrade(&state));
    let module = ModBuilder::new(MOD_NAME, dispatcher, keybinds)
        .description("Toggle whether the game may autosave")
        .hook(gate)
        .transient_hook(overlay)
        .keybind(bind)
        .on_enable(move || {
            if let Some(state) = on_enable.upgrade() {
                state.on_enable();
            }
        })
        .on_disable(move || {
            if let Some(state) = on_disable.upgrade() {
                state.on_disable();
            }
        })
        .build()?;

    Ok((module, state))
}
