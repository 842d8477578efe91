//! Input vocabulary

/// Key event as reported by the engine's input callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputEvent {
    Pressed = 0,
    Released = 1,
    Repeat = 2,
    DoubleClick = 3,
    Axis = 4,
}

impl InputEvent {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Pressed),
            1 => Some(Self::Released),
            2 => Some(Self::Repeat),
            3 => Some(Self::DoubleClick),
            4 => Some(Self::Axis),
            _ => None,
        }
    }
}

/// Default key for the sell action
pub const DEFAULT_SELL_KEY: &str = "Backslash";

/// Default key for toggling the autosave blocker
pub const DEFAULT_AUTOSAVE_TOGGLE_KEY: &str = "F2";

/// Substring identifying the gamepad Start button in key names
pub const GAMEPAD_START: &str = "Start";

/// Inline image markup shown instead of `[key]` for gamepad users
pub const GAMEPAD_START_MARKUP: &str = "<IMG src='xbox360_Start' vspace='-3'>";
