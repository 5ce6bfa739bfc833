//! Order domain errors.
//!
//! All variants are expected business-rule violations: recoverable,
//! non-fatal, and carrying enough structured data (offending item, order,
//! state names) for a caller to build a precise response without
//! re-querying. The one exception is the invalid-argument case inside
//! [`StockError`], which signals a bug in the caller.

use thiserror::Error;

use kahawa_inventory::{ItemId, StockError};

use crate::order::{OrderId, OrderState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// A state transition the machine does not allow.
    #[error("changing the state of an order from \"{current}\" to \"{attempted}\" is forbidden")]
    OperationForbidden {
        current: OrderState,
        attempted: OrderState,
    },

    /// An item-list mutation attempted outside the `CREATED`/`PENDING` states.
    #[error(
        "an order's item list can only be modified while the order is either in the \
         \"CREATED\" or \"PENDING\" state; the current state of the order is \"{current}\""
    )]
    ItemListForbidden { current: OrderState },

    /// The item's stock is depleted, so it cannot be added to an order.
    #[error("the item \"{name}\" is out of stock")]
    OutOfStock { item: ItemId, name: String },

    /// The operation requires at least one line entry.
    #[error("the order {order} has no associated order items")]
    OrderEmpty { order: OrderId },

    /// The given item has no line entry in the order.
    #[error("the item {item} is not part of the item list of order {order}")]
    ItemNotInOrder { item: ItemId, order: OrderId },

    /// Rejections must explain themselves.
    #[error("comments are required when rejecting an order")]
    CommentsRequired,

    /// A stock deduction failed during approval; nothing was deducted.
    #[error(transparent)]
    Stock(#[from] StockError),
}
