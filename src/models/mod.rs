//! Core data models for the employee directory.
//!
//! This module contains the domain models shared by the store, the data
//! service and the HTTP layer.

mod employee;

pub use employee::{DeleteConfirmation, Employee, EmployeeChanges, NewEmployee};
