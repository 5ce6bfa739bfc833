//! Acting-user identity.
//!
//! Every mutating operation in the domain receives the user performing it
//! (or none, for anonymous/system actions where permitted). The shop only
//! distinguishes two roles: staff users, who may set prices and perform
//! administrative mutations, and everyone else.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Reference to a user account, carrying the staff flag privilege checks need.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    id: UserId,
    staff: bool,
}

impl UserRef {
    pub fn new(id: UserId, staff: bool) -> Self {
        Self { id, staff }
    }

    /// A staff account (employees, administrators).
    pub fn staff(id: UserId) -> Self {
        Self::new(id, true)
    }

    /// A regular (non-staff) account.
    pub fn regular(id: UserId) -> Self {
        Self::new(id, false)
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn is_staff(&self) -> bool {
        self.staff
    }
}

impl core::fmt::Display for UserRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.id, f)
    }
}
