//! Network roles and inventory marks
//!
//! Numeric values match what the engine stores in its objects, so adapters can
//! convert raw integers read from a field with [`NetRole::from_raw`] and
//! [`ItemMark::from_raw`].

/// Replication role of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NetRole {
    None = 0,
    SimulatedProxy = 1,
    AutonomousProxy = 2,
    Authority = 3,
}

impl NetRole {
    /// Convert a raw engine value. Anything above `Authority` (the engine's
    /// `MAX` sentinel) is treated as `None`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::SimulatedProxy,
            2 => Self::AutonomousProxy,
            3 => Self::Authority,
            _ => Self::None,
        }
    }

    /// Only the authoritative side may mutate game state
    pub fn is_authority(self) -> bool {
        self == Self::Authority
    }
}

impl Default for NetRole {
    fn default() -> Self {
        Self::None
    }
}

/// User mark on an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemMark {
    Standard = 0,
    Trash = 1,
    Favorite = 2,
}

impl ItemMark {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Trash,
            2 => Self::Favorite,
            _ => Self::Standard,
        }
    }
}

impl Default for ItemMark {
    fn default() -> Self {
        Self::Standard
    }
}
