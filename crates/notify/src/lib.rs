//! `kahawa-notify` — customer SMS notifications.
//!
//! A collaborator that consumes order lifecycle events and texts the
//! customer about them. Delivery is fire-and-forget: failures are logged,
//! never propagated back to the mutation that produced the event.

pub mod sms;

pub use sms::{CustomerDirectory, OrderSmsNotifier, SmsGateway};
