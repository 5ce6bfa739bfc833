//! `kahawa-parties` — customer and employee profiles.
//!
//! Customers place orders; employees review them. Both are thin profile
//! entities linked to a user account, with validation rules that keep the
//! staff/non-staff boundary intact.

pub mod customer;
pub mod employee;

pub use customer::{Customer, CustomerChanges, CustomerId};
pub use employee::{Employee, EmployeeId, Gender};
