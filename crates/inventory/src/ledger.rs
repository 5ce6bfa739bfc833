//! The stockroom: every item the shop holds, keyed by id.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use kahawa_core::UserRef;

use crate::item::{Item, ItemId, StockError};

/// Collection of inventory items with atomic multi-item deduction.
#[derive(Debug, Clone, Default)]
pub struct Stockroom {
    items: HashMap<ItemId, Item>,
}

impl Stockroom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: Item) -> ItemId {
        let id = item.id();
        self.items.insert(id, item);
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Deduct every `(item, quantity)` demand, all-or-nothing.
    ///
    /// Demands are applied in order to a staged copy of the touched items;
    /// the first item with insufficient stock aborts the whole operation
    /// with [`StockError::NotEnoughStock`] and no item's stock changes. On
    /// success all staged deductions are committed together.
    pub fn deduct_all(
        &mut self,
        actor: &UserRef,
        demands: &[(ItemId, i64)],
    ) -> Result<(), StockError> {
        let mut staged: HashMap<ItemId, Item> = HashMap::with_capacity(demands.len());

        for &(id, quantity) in demands {
            let item = match staged.entry(id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let item = self
                        .items
                        .get(&id)
                        .cloned()
                        .ok_or(StockError::UnknownItem { item: id })?;
                    entry.insert(item)
                }
            };
            item.deduct(actor, quantity)?;
        }

        let count = staged.len();
        for (id, item) in staged {
            self.items.insert(id, item);
        }
        tracing::info!(items = count, "stock deductions committed");

        Ok(())
    }
}
