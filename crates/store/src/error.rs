use thiserror::Error;

use kahawa_core::ValidationErrors;
use kahawa_inventory::ItemId;
use kahawa_orders::OrderError;

/// Persistence-layer failures.
///
/// Domain policy errors and validation errors pass through unchanged so the
/// caller can translate them; the store only adds lookup and referential
/// failures of its own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Entity validation failed; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A business rule of the order state machine was violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A referenced entity does not exist.
    #[error("no such {entity}")]
    NotFound { entity: &'static str },

    /// The item still has order lines pointing at it and cannot be deleted.
    #[error("the item {item} is referenced by existing orders and cannot be deleted")]
    ItemInUse { item: ItemId },
}
