//! `kahawa-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the acting-user identity passed to every mutating
//! operation, creator/modifier audit stamping, choice enums with persisted
//! codes, and the declarative validation framework run before persistence.

pub mod actor;
pub mod audit;
pub mod choice;
pub mod id;
pub mod validate;

pub use actor::UserRef;
pub use audit::{Audit, Audited};
pub use choice::Choice;
pub use id::{EntityId, ParseIdError, UserId};
pub use validate::{
    FieldRule, Validated, ValidationConfig, ValidationErrors, Validator, Violation,
};
