//! Employee model and related types.
//!
//! This module defines the persisted [`Employee`] row together with the
//! validated inputs used to create ([`NewEmployee`]) and partially update
//! ([`EmployeeChanges`]) it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An employee row as stored in the `employees` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Employee {
    /// Store-generated identifier. Never changes once assigned.
    pub id: i64,
    /// Full name, 1 to 100 characters.
    pub name: String,
    /// Email address, unique across all employees.
    pub email: String,
    /// Job title, 1 to 100 characters.
    pub position: String,
    /// Annual salary, never negative.
    pub salary: f64,
    /// When the employee was hired (UTC, whole seconds).
    pub date_hired: NaiveDateTime,
    /// Filename of the uploaded profile picture, if any.
    pub profile_picture: Option<String>,
}

/// A validated request to create an employee.
///
/// Produced by [`crate::schema::validate_for_create`]; every field has
/// already passed its constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Job title.
    pub position: String,
    /// Annual salary.
    pub salary: f64,
    /// Filename of the uploaded profile picture, if any.
    pub profile_picture: Option<String>,
}

/// A validated partial update.
///
/// `None` means "leave the current value alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement email; uniqueness is checked by the data service.
    pub email: Option<String>,
    /// Replacement job title.
    pub position: Option<String>,
    /// Replacement salary.
    pub salary: Option<f64>,
    /// Replacement profile picture filename.
    pub profile_picture: Option<String>,
}

impl EmployeeChanges {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.profile_picture.is_none()
    }

    /// Returns the new email if it differs from `current`.
    pub fn email_change<'a>(&'a self, current: &str) -> Option<&'a str> {
        self.email.as_deref().filter(|email| *email != current)
    }

    /// Applies every supplied field to `employee`.
    ///
    /// # Examples
    ///
    /// ```
    /// use employee_directory::models::{Employee, EmployeeChanges};
    /// use chrono::NaiveDate;
    ///
    /// let mut employee = Employee {
    ///     id: 1,
    ///     name: "John Doe".to_string(),
    ///     email: "john.doe@example.com".to_string(),
    ///     position: "Software Engineer".to_string(),
    ///     salary: 70000.0,
    ///     date_hired: NaiveDate::from_ymd_opt(2023, 6, 1)
    ///         .unwrap()
    ///         .and_hms_opt(9, 0, 0)
    ///         .unwrap(),
    ///     profile_picture: None,
    /// };
    ///
    /// let changes = EmployeeChanges {
    ///     name: Some("Jane Doe".to_string()),
    ///     ..Default::default()
    /// };
    /// changes.apply_to(&mut employee);
    ///
    /// assert_eq!(employee.name, "Jane Doe");
    /// assert_eq!(employee.email, "john.doe@example.com");
    /// ```
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(profile_picture) = self.profile_picture {
            employee.profile_picture = Some(profile_picture);
        }
    }
}

/// Confirmation returned after an employee is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// The id of the deleted employee.
    pub id: i64,
    /// Human-readable confirmation.
    pub message: String,
}

impl DeleteConfirmation {
    /// Builds the confirmation for a deleted id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            message: format!("Employee {} deleted successfully", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_employee() -> Employee {
        Employee {
            id: 1,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            position: "Software Engineer".to_string(),
            salary: 70000.0,
            date_hired: NaiveDate::from_ymd_opt(2023, 6, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            profile_picture: Some("john.png".to_string()),
        }
    }

    #[test]
    fn test_empty_changes_leave_employee_untouched() {
        let mut employee = create_test_employee();
        let changes = EmployeeChanges::default();
        assert!(changes.is_empty());

        changes.apply_to(&mut employee);
        assert_eq!(employee, create_test_employee());
    }

    #[test]
    fn test_name_only_change_keeps_other_fields() {
        let mut employee = create_test_employee();
        let changes = EmployeeChanges {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        changes.apply_to(&mut employee);
        assert_eq!(employee.name, "Jane Doe");
        assert_eq!(employee.email, "john.doe@example.com");
        assert_eq!(employee.position, "Software Engineer");
        assert_eq!(employee.salary, 70000.0);
        assert_eq!(employee.profile_picture.as_deref(), Some("john.png"));
    }

    #[test]
    fn test_salary_change_to_zero_is_applied() {
        let mut employee = create_test_employee();
        let changes = EmployeeChanges {
            salary: Some(0.0),
            ..Default::default()
        };
        changes.apply_to(&mut employee);
        assert_eq!(employee.salary, 0.0);
    }

    #[test]
    fn test_email_change_ignores_identical_email() {
        let changes = EmployeeChanges {
            email: Some("john.doe@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(changes.email_change("john.doe@example.com"), None);
        assert_eq!(
            changes.email_change("old@example.com"),
            Some("john.doe@example.com")
        );
    }

    #[test]
    fn test_delete_confirmation_message() {
        let confirmation = DeleteConfirmation::new(12);
        assert_eq!(confirmation.id, 12);
        assert_eq!(confirmation.message, "Employee 12 deleted successfully");
    }
}
