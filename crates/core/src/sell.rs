//! Sell transaction
//!
//! Selling an item is a fixed sequence: every precondition is checked before
//! the first effect, so a rejected sale leaves money, inventory and buyback
//! history untouched. Once the checks pass the effects run in order:
//!
//! 1. credit the item's value
//! 2. remove the item (world: stop it being picked up; backpack: take it out)
//! 3. update pickup statistics
//! 4. record a clone into the buyback history
//! 5. play the sell sound and show the credited amount
//!
//! The engine side is reached through three capability traits so the same
//! transaction serves both sale sources and runs against fakes in tests.

use hookwork_engine::EngineError;
use hookwork_sdk::targets::UNSELLABLE_CLASSES;
use hookwork_sdk::{ItemMark, NetRole};

/// Where the sold item lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleSource {
    /// A pickup lying in the world
    World,
    /// An item in the player's backpack
    Backpack,
}

impl SaleSource {
    /// HUD text announcing a sale of `amount`
    pub fn message(self, amount: i64) -> String {
        match self {
            Self::World => format!("Sold for {}", format_currency(amount)),
            Self::Backpack => format!("+{}", format_currency(amount)),
        }
    }
}

/// `1500` → `"$1,500"`
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Why a sale did not happen
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaleRejected {
    #[error("Only the authoritative side can sell")]
    NotAuthority,

    #[error("No item selected")]
    NothingSelected,

    #[error("Items of class {0} cannot be sold")]
    ExcludedType(String),

    #[error("Item can no longer be picked up")]
    NotPickupable,

    #[error("Item is equipped")]
    Equipped,

    #[error("Item is favorited")]
    Favorited,
}

/// Sale errors
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// A precondition failed; nothing was changed
    #[error(transparent)]
    Rejected(#[from] SaleRejected),

    /// The engine failed while reading the item or applying an effect
    #[error("Engine error during sale: {0}")]
    Engine(#[from] EngineError),
}

impl SaleError {
    pub fn rejection(&self) -> Option<&SaleRejected> {
        match self {
            Self::Rejected(reason) => Some(reason),
            Self::Engine(_) => None,
        }
    }
}

/// Read access to a sellable item
pub trait Sellable {
    /// Engine class of the item, matched against the excluded classes
    fn class_tag(&self) -> Result<String, EngineError>;

    fn monetary_value(&self) -> Result<i64, EngineError>;

    /// Backpack items are always pickupable
    fn is_pickupable(&self) -> Result<bool, EngineError>;

    fn is_equipped(&self) -> Result<bool, EngineError>;

    fn mark(&self) -> Result<ItemMark, EngineError>;
}

/// The economy and inventory side of a sale
pub trait SaleLedger<I: ?Sized> {
    fn credit(&mut self, amount: i64) -> Result<(), EngineError>;

    /// Take the item out of play
    fn remove(&mut self, item: &I, source: SaleSource) -> Result<(), EngineError>;

    fn record_pickup_stats(&mut self, item: &I, source: SaleSource) -> Result<(), EngineError>;

    /// Remember a copy of the item for buyback
    fn record_buyback(&mut self, item: &I) -> Result<(), EngineError>;
}

/// Audible and visible acknowledgement of a sale
pub trait SaleFeedback {
    fn play_sell_sound(&self);

    fn show_message(&self, text: &str);
}

/// Classes that can never be sold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePolicy {
    pub excluded_classes: Vec<String>,
}

impl Default for SalePolicy {
    fn default() -> Self {
        Self {
            excluded_classes: UNSELLABLE_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SalePolicy {
    pub fn is_excluded(&self, class_tag: &str) -> bool {
        self.excluded_classes.iter().any(|c| c == class_tag)
    }
}

/// Result of a completed sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub amount: i64,
    pub source: SaleSource,
    pub message: String,
}

/// One sale attempt from a given source
#[derive(Debug, Clone, Copy)]
pub struct SellTransaction<'a> {
    policy: &'a SalePolicy,
    source: SaleSource,
}

impl<'a> SellTransaction<'a> {
    pub fn new(policy: &'a SalePolicy, source: SaleSource) -> Self {
        Self { policy, source }
    }

    /// Check every precondition, then apply every effect
    pub fn execute<I, L, F>(
        &self,
        role: NetRole,
        item: Option<&I>,
        ledger: &mut L,
        feedback: &F,
    ) -> Result<SaleReceipt, SaleError>
    where
        I: Sellable + ?Sized,
        L: SaleLedger<I> + ?Sized,
        F: SaleFeedback + ?Sized,
    {
        let (item, amount) = self.check(role, item)?;

        ledger.credit(amount)?;
        ledger.remove(item, self.source)?;
        ledger.record_pickup_stats(item, self.source)?;
        ledger.record_buyback(item)?;

        let message = self.source.message(amount);
        feedback.play_sell_sound();
        feedback.show_message(&message);

        tracing::debug!("Sold item from {:?} for {}", self.source, amount);

        Ok(SaleReceipt {
            amount,
            source: self.source,
            message,
        })
    }

    /// Preconditions in order; yields the item and its value
    fn check<'i, I>(&self, role: NetRole, item: Option<&'i I>) -> Result<(&'i I, i64), SaleError>
    where
        I: Sellable + ?Sized,
    {
        if !role.is_authority() {
            return Err(SaleRejected::NotAuthority.into());
        }
        let item = item.ok_or(SaleRejected::NothingSelected)?;

        let class_tag = item.class_tag()?;
        if self.policy.is_excluded(&class_tag) {
            return Err(SaleRejected::ExcludedType(class_tag).into());
        }
        if !item.is_pickupable()? {
            return Err(SaleRejected::NotPickupable.into());
        }
        if item.is_equipped()? {
            return Err(SaleRejected::Equipped.into());
        }
        if item.mark()? == ItemMark::Favorite {
            return Err(SaleRejected::Favorited.into());
        }

        Ok((item, item.monetary_value()?))
    }
}
