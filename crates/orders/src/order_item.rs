use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kahawa_core::{Audit, Audited, EntityId, UserRef};
use kahawa_inventory::{Item, ItemId};

/// Order line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(pub EntityId);

impl OrderItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Partial update of an order line; unset fields retain their prior value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderItemChanges {
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
}

impl OrderItemChanges {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.unit_price.is_none()
    }
}

/// A priced quantity of one inventory item within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    item: ItemId,
    quantity: u32,
    unit_price: Decimal,
    audit: Audit,
}

impl OrderItem {
    /// Build a line for `item`.
    ///
    /// Only staff may set an arbitrary unit price: if the creator is absent
    /// or non-staff, any supplied `unit_price` is silently discarded and the
    /// item's current price is used. An omitted `unit_price` defaults to the
    /// item's current price regardless of who is creating.
    pub(crate) fn new(
        creator: Option<&UserRef>,
        item: &Item,
        quantity: u32,
        unit_price: Option<Decimal>,
    ) -> Self {
        let unit_price = match (creator, unit_price) {
            (Some(creator), Some(price)) if creator.is_staff() => price,
            _ => item.price(),
        };

        Self {
            id: OrderItemId::new(EntityId::new()),
            item: item.id(),
            quantity,
            unit_price,
            audit: Audit::new(creator),
        }
    }

    pub fn id(&self) -> OrderItemId {
        self.id
    }

    /// The inventory item this line refers to.
    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// The unit price times the quantity ordered.
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Apply a partial update and stamp the modifier.
    ///
    /// A `unit_price` change is silently dropped unless the modifier is
    /// staff; the rest of the changes apply normally. If nothing remains to
    /// apply, the whole call is a no-op (no modifier stamp, no timestamp
    /// bump).
    pub(crate) fn update(&mut self, modifier: Option<&UserRef>, changes: OrderItemChanges) {
        let mut changes = changes;
        if !modifier.is_some_and(UserRef::is_staff) {
            changes.unit_price = None;
        }
        if changes.is_empty() {
            return;
        }

        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = changes.unit_price {
            self.unit_price = unit_price;
        }
        self.audit.touch(modifier);
    }
}

impl Audited for OrderItem {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}
