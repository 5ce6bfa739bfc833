use serde::{Deserialize, Serialize};

use kahawa_core::{Audit, Audited, EntityId, UserRef, Validated, Validator, Violation, choices};

/// Employee identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub EntityId);

impl EmployeeId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

choices! {
    /// The gender of a person.
    pub enum Gender {
        Male => ('M', "MALE"),
        Female => ('F', "FEMALE"),
    }
}

/// An employee of the beverage shop.
///
/// Employees review customer orders; the linked user account must be staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    name: String,
    gender: Gender,
    user: UserRef,
    audit: Audit,
}

impl Employee {
    pub fn new(
        creator: Option<&UserRef>,
        name: impl Into<String>,
        gender: Gender,
        user: UserRef,
    ) -> Self {
        Self {
            id: EmployeeId::new(EntityId::new()),
            name: name.into(),
            gender,
            user,
            audit: Audit::new(creator),
        }
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// The staff user account associated with this employee.
    pub fn user(&self) -> &UserRef {
        &self.user
    }
}

impl Audited for Employee {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

impl Validated for Employee {
    fn validator() -> Validator<Self> {
        Validator::new()
            .field("user", |employee: &Employee| {
                if !employee.user.is_staff() {
                    Err(Violation::invalid(
                        "The user instance provided must be a staff user.",
                    ))
                } else {
                    Ok(())
                }
            })
            .non_editable_field("created_by", |employee: &Employee| {
                match employee.audit.created_by() {
                    Some(creator) if !creator.is_staff() => Err(Violation::invalid(
                        "Only staff users can add new employees.",
                    )),
                    _ => Ok(()),
                }
            })
            .non_editable_field("updated_by", |employee: &Employee| {
                match employee.audit.updated_by() {
                    Some(modifier) if !modifier.is_staff() => Err(Violation::invalid(
                        "Only staff users can modify existing employees data.",
                    )),
                    _ => Ok(()),
                }
            })
    }
}

impl core::fmt::Display for Employee {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kahawa_core::{Choice, UserId, ValidationConfig};

    #[test]
    fn non_staff_linked_user_is_rejected() {
        let employee = Employee::new(
            None,
            "Otieno",
            Gender::Male,
            UserRef::regular(UserId::new()),
        );

        let errors = employee
            .validate(&ValidationConfig::default(), &[])
            .unwrap_err();
        assert_eq!(errors.for_field("user").len(), 1);
    }

    #[test]
    fn staff_creator_and_staff_user_pass() {
        let employee = Employee::new(
            Some(&UserRef::staff(UserId::new())),
            "Otieno",
            Gender::Male,
            UserRef::staff(UserId::new()),
        );

        let config = ValidationConfig {
            include_non_editable: true,
            ..ValidationConfig::default()
        };
        assert!(employee.validate(&config, &[]).is_ok());
    }

    #[test]
    fn gender_codes_round_trip() {
        assert_eq!(Gender::from_code('F'), Some(Gender::Female));
        assert_eq!(Gender::Male.label(), "MALE");
    }
}
