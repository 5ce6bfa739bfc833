//! Creator/modifier stamping shared by every mutable entity.
//!
//! Each entity embeds an [`Audit`] and stamps it itself: the acting user is
//! passed explicitly to the mutating operation, which records them as the
//! creator on first save or as the last modifier afterwards. `created_by` is
//! immutable once set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::UserRef;

/// Creation/modification metadata embedded in auditable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    created_at: DateTime<Utc>,
    created_by: Option<UserRef>,
    updated_at: DateTime<Utc>,
    updated_by: Option<UserRef>,
}

impl Audit {
    /// Stamp a freshly created entity.
    pub fn new(creator: Option<&UserRef>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: creator.copied(),
            updated_at: now,
            updated_by: None,
        }
    }

    /// Record a modification by the given user.
    ///
    /// Callers must only invoke this when at least one field actually
    /// changed; a zero-change update is a no-op and leaves the stamp alone.
    pub fn touch(&mut self, modifier: Option<&UserRef>) {
        self.updated_at = Utc::now();
        self.updated_by = modifier.copied();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<&UserRef> {
        self.created_by.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn updated_by(&self) -> Option<&UserRef> {
        self.updated_by.as_ref()
    }
}

/// Access to an entity's audit stamp.
pub trait Audited {
    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;
}
