//! `kahawa-inventory` — the beverage stock ledger.
//!
//! Tracks the on-hand quantity of every item the shop offers and exposes
//! atomic stock deduction: single-item through [`Item::deduct`], multi-item
//! all-or-nothing through [`Stockroom::deduct_all`] (used by order
//! approval).

pub mod item;
pub mod ledger;

pub use item::{BeverageType, Item, ItemChanges, ItemId, NewItem, StockError, StockState};
pub use ledger::Stockroom;
