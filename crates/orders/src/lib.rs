//! `kahawa-orders` — the order lifecycle state machine.
//!
//! An [`Order`] owns its line entries and governs which mutations are legal
//! in which state: item-list edits while `CREATED` or `PENDING`, review
//! transitions out of `PENDING`, cancellation out of either. Approval is
//! the only path that touches inventory, deducting every line's quantity
//! all-or-nothing through the stockroom.

pub mod error;
pub mod event;
pub mod order;
pub mod order_item;

pub use error::OrderError;
pub use event::{OrderEvent, OrderEventKind};
pub use order::{Order, OrderId, OrderState};
pub use order_item::{OrderItem, OrderItemChanges, OrderItemId};
