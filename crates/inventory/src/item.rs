use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kahawa_core::{Audit, Audited, EntityId, UserRef, Validated, Validator, Violation, choices};

/// Inventory item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

choices! {
    /// The different types of beverages in the shop.
    pub enum BeverageType {
        Coffee => ('C', "COFFEE"),
        Tea => ('T', "TEA"),
    }
}

choices! {
    /// The availability states of an item, derived from `on_hand` and
    /// `warn_limit`, never stored.
    pub enum StockState {
        Available => ('A', "AVAILABLE"),
        FewRemaining => ('F', "FEW REMAINING"),
        OutOfStock => ('O', "OUT OF STOCK"),
    }
}

/// Stock adjustment failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// A negative deduction was requested. This is a bug in the caller, not
    /// a recoverable business condition.
    #[error("\"quantity\" must be a positive value, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// The deduction would drive the stock negative; nothing was deducted.
    #[error(
        "the current stock, {current_stock}, of item \"{name}\" is not enough \
         for a deduction by {adjustment} units"
    )]
    NotEnoughStock {
        item: ItemId,
        name: String,
        adjustment: i64,
        current_stock: i64,
    },

    /// A demand referenced an item the ledger does not hold.
    #[error("item {item} is not in the stockroom")]
    UnknownItem { item: ItemId },
}

/// Properties of a new inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub beverage_name: String,
    pub beverage_type: BeverageType,
    pub caffeinated: bool,
    pub flavored: bool,
    pub on_hand: i64,
    pub price: Decimal,
    pub warn_limit: i64,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            beverage_name: String::new(),
            beverage_type: BeverageType::Coffee,
            caffeinated: false,
            flavored: false,
            on_hand: 0,
            price: Decimal::ZERO,
            warn_limit: 3,
        }
    }
}

/// Partial update of an item; unset fields retain their prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub beverage_name: Option<String>,
    pub caffeinated: Option<bool>,
    pub flavored: Option<bool>,
    pub on_hand: Option<i64>,
    pub price: Option<Decimal>,
    pub warn_limit: Option<i64>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.beverage_name.is_none()
            && self.caffeinated.is_none()
            && self.flavored.is_none()
            && self.on_hand.is_none()
            && self.price.is_none()
            && self.warn_limit.is_none()
    }
}

/// An item (beverage) offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    beverage_name: String,
    beverage_type: BeverageType,
    caffeinated: bool,
    flavored: bool,
    on_hand: i64,
    price: Decimal,
    warn_limit: i64,
    audit: Audit,
}

impl Item {
    pub fn new(creator: Option<&UserRef>, props: NewItem) -> Self {
        Self {
            id: ItemId::new(EntityId::new()),
            beverage_name: props.beverage_name,
            beverage_type: props.beverage_type,
            caffeinated: props.caffeinated,
            flavored: props.flavored,
            on_hand: props.on_hand,
            price: props.price,
            warn_limit: props.warn_limit,
            audit: Audit::new(creator),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn beverage_name(&self) -> &str {
        &self.beverage_name
    }

    pub fn beverage_type(&self) -> BeverageType {
        self.beverage_type
    }

    pub fn caffeinated(&self) -> bool {
        self.caffeinated
    }

    pub fn flavored(&self) -> bool {
        self.flavored
    }

    pub fn on_hand(&self) -> i64 {
        self.on_hand
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn warn_limit(&self) -> i64 {
        self.warn_limit
    }

    /// There is plenty of stock: more than the warn limit remains.
    pub fn is_available(&self) -> bool {
        self.on_hand > self.warn_limit
    }

    /// The warn limit or fewer units remain in stock.
    pub fn is_few_remaining(&self) -> bool {
        self.on_hand <= self.warn_limit
    }

    /// The stock has been depleted.
    pub fn is_out_of_stock(&self) -> bool {
        self.on_hand == 0
    }

    /// The current availability state. Out-of-stock wins over few-remaining.
    pub fn state(&self) -> StockState {
        if self.is_out_of_stock() {
            StockState::OutOfStock
        } else if self.is_few_remaining() {
            StockState::FewRemaining
        } else {
            StockState::Available
        }
    }

    /// Deduct `quantity` units from the on-hand stock.
    ///
    /// Fails with [`StockError::NotEnoughStock`] if the deduction would
    /// leave the stock negative; the stock is then left unchanged (no
    /// partial deduction). On success the actor is stamped as the last
    /// modifier and the remaining stock is returned.
    pub fn deduct(&mut self, actor: &UserRef, quantity: i64) -> Result<i64, StockError> {
        if quantity < 0 {
            return Err(StockError::InvalidQuantity { quantity });
        }

        let new_stock = self.on_hand - quantity;
        if new_stock < 0 {
            return Err(StockError::NotEnoughStock {
                item: self.id,
                name: self.beverage_name.clone(),
                adjustment: quantity,
                current_stock: self.on_hand,
            });
        }

        self.on_hand = new_stock;
        self.audit.touch(Some(actor));
        tracing::debug!(item = %self.id, quantity, new_stock, "stock deducted");

        Ok(new_stock)
    }

    /// Apply a partial update and stamp the modifier.
    ///
    /// An empty change-set is a no-op: no field changes, no modifier stamp,
    /// no timestamp bump.
    pub fn update(&mut self, modifier: Option<&UserRef>, changes: ItemChanges) -> &mut Self {
        if changes.is_empty() {
            return self;
        }

        if let Some(beverage_name) = changes.beverage_name {
            self.beverage_name = beverage_name;
        }
        if let Some(caffeinated) = changes.caffeinated {
            self.caffeinated = caffeinated;
        }
        if let Some(flavored) = changes.flavored {
            self.flavored = flavored;
        }
        if let Some(on_hand) = changes.on_hand {
            self.on_hand = on_hand;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(warn_limit) = changes.warn_limit {
            self.warn_limit = warn_limit;
        }
        self.audit.touch(modifier);
        self
    }
}

impl Audited for Item {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

impl Validated for Item {
    fn validator() -> Validator<Self> {
        Validator::new()
            .field("on_hand", |item: &Item| {
                if item.on_hand < 0 {
                    Err(Violation::invalid(
                        "The available quantity of an item cannot be a negative value.",
                    ))
                } else {
                    Ok(())
                }
            })
            .field("price", |item: &Item| {
                if item.price < Decimal::ZERO {
                    Err(Violation::invalid("The price of an item cannot be negative."))
                } else {
                    Ok(())
                }
            })
            .field("warn_limit", |item: &Item| {
                if item.warn_limit < 0 {
                    Err(Violation::invalid(
                        "The warn limit of an item cannot be a negative value.",
                    ))
                } else {
                    Ok(())
                }
            })
            .non_editable_field("created_by", |item: &Item| {
                match item.audit.created_by() {
                    Some(creator) if !creator.is_staff() => Err(Violation::invalid(
                        "Only staff users can add new inventory items.",
                    )),
                    _ => Ok(()),
                }
            })
            .non_editable_field("updated_by", |item: &Item| {
                match item.audit.updated_by() {
                    Some(modifier) if !modifier.is_staff() => Err(Violation::invalid(
                        "Only staff users can modify existing inventory items.",
                    )),
                    _ => Ok(()),
                }
            })
    }
}
