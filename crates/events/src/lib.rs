//! `kahawa-events` — event trait and pub/sub distribution.
//!
//! The order state machine emits explicit lifecycle events instead of
//! relying on implicit persistence hooks; this crate provides the event
//! contract and a lightweight bus for fanning those events out to
//! collaborators (the SMS notifier, dev tooling, tests).

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
