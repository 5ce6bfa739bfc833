//! `kahawa-observability` — shared tracing/logging setup.
//!
//! The domain crates emit structured `tracing` events (stock deductions,
//! state transitions, notification failures); the hosting process calls
//! [`init`] once to get them onto stderr.

pub mod tracing;

/// Initialize process-wide tracing/logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
