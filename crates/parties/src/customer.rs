use serde::{Deserialize, Serialize};

use kahawa_core::{Audit, Audited, EntityId, UserRef, Validated, Validator, Violation};

/// Customer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub EntityId);

impl CustomerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Partial update of a customer; unset fields retain their prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
    pub phone_number: Option<String>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.phone_number.is_none()
    }
}

/// A customer of the beverage shop.
///
/// Customers make orders; the linked user account must be non-staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    address: Option<String>,
    phone_number: String,
    user: UserRef,
    audit: Audit,
}

impl Customer {
    pub fn new(
        creator: Option<&UserRef>,
        name: impl Into<String>,
        address: Option<String>,
        phone_number: impl Into<String>,
        user: UserRef,
    ) -> Self {
        Self {
            id: CustomerId::new(EntityId::new()),
            name: name.into(),
            address,
            phone_number: phone_number.into(),
            user,
            audit: Audit::new(creator),
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// The user account associated with this customer.
    pub fn user(&self) -> &UserRef {
        &self.user
    }

    /// Apply a partial update and stamp the modifier.
    ///
    /// An empty change-set is a no-op: no field changes, no modifier stamp,
    /// no timestamp bump.
    pub fn update(&mut self, modifier: Option<&UserRef>, changes: CustomerChanges) -> &mut Self {
        if changes.is_empty() {
            return self;
        }

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(phone_number) = changes.phone_number {
            self.phone_number = phone_number;
        }
        self.audit.touch(modifier);
        self
    }
}

impl Audited for Customer {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

impl Validated for Customer {
    fn validator() -> Validator<Self> {
        Validator::new()
            .field("user", |customer: &Customer| {
                if customer.user.is_staff() {
                    Err(Violation::invalid(
                        "The user instance provided must be a non-staff user.",
                    ))
                } else {
                    Ok(())
                }
            })
            .non_editable_field("created_by", |customer: &Customer| {
                match customer.audit.created_by() {
                    Some(creator)
                        if !creator.is_staff() && creator.id() != customer.user.id() =>
                    {
                        Err(Violation::invalid(
                            "Only staff users or the user to be associated with the \
                             customer can add the customer.",
                        ))
                    }
                    _ => Ok(()),
                }
            })
            .non_editable_field("updated_by", |customer: &Customer| {
                match customer.audit.updated_by() {
                    Some(modifier)
                        if !modifier.is_staff() && modifier.id() != customer.user.id() =>
                    {
                        Err(Violation::invalid(
                            "Only staff users or the user associated with the customer \
                             can modify the customer's details.",
                        ))
                    }
                    _ => Ok(()),
                }
            })
    }
}

impl core::fmt::Display for Customer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
