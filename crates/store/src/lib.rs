//! `kahawa-store` — in-memory persistence adapter.
//!
//! A thin adapter around the core state machine: repositories for the four
//! entity families, validation-on-save with an explicit configuration,
//! referential rules (cascade-delete of order lines, protected inventory
//! items), the transactional boundary around order approval, and
//! post-commit publication of order lifecycle events.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;
