//! Validation and serialization schema for employee records.
//!
//! Every field of an [`Employee`] is described once in [`EMPLOYEE_SCHEMA`]:
//! its kind, whether input must supply it, whether it is output-only, and its
//! bounds. Inbound payloads are checked against that table; outbound records
//! are rendered as [`EmployeeRecord`].

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{Employee, EmployeeChanges, NewEmployee};

/// Output format of `date_hired`.
pub const DATE_HIRED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Input format accepted for dates.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Extensions accepted for profile pictures, compared case-insensitively.
pub const PICTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// The value type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Store-generated integer.
    Integer,
    /// Free text.
    Text,
    /// Text that must have an email shape.
    Email,
    /// Floating-point number.
    Float,
    /// Timestamp.
    DateTime,
    /// Filename with an image extension.
    PictureFilename,
}

/// Constraints for one employee field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConstraint {
    /// Field name as it appears in forms and serialized records.
    pub name: &'static str,
    /// The value type.
    pub kind: FieldKind,
    /// Whether creation requires the field.
    pub required: bool,
    /// Whether the field is only ever produced, never accepted.
    pub output_only: bool,
    /// Minimum length in characters.
    pub min_len: Option<usize>,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Minimum numeric value, inclusive.
    pub min_value: Option<f64>,
}

impl FieldConstraint {
    const fn output(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            output_only: true,
            min_len: None,
            max_len: None,
            min_value: None,
        }
    }

    /// Checks a raw input value against this constraint.
    pub fn check(&self, value: &str) -> DirectoryResult<()> {
        let length = value.chars().count();
        if let Some(min) = self.min_len {
            if length < min {
                return Err(self.length_error());
            }
        }
        if let Some(max) = self.max_len {
            if length > max {
                return Err(self.length_error());
            }
        }

        match self.kind {
            FieldKind::Email if !is_valid_email(value) => Err(DirectoryError::invalid(
                self.name,
                "must be a valid email address",
            )),
            FieldKind::Float => {
                let number = parse_number(self.name, value)?;
                match self.min_value {
                    Some(min) if number < min => Err(DirectoryError::invalid(
                        self.name,
                        format!("must be greater than or equal to {}", min),
                    )),
                    _ => Ok(()),
                }
            }
            FieldKind::PictureFilename if !has_picture_extension(value) => {
                Err(DirectoryError::invalid(
                    self.name,
                    "must be a .png, .jpg, or .jpeg file",
                ))
            }
            _ => Ok(()),
        }
    }

    fn length_error(&self) -> DirectoryError {
        let message = match (self.min_len, self.max_len) {
            (Some(min), Some(max)) => format!("must be between {} and {} characters", min, max),
            (None, Some(max)) => format!("must be at most {} characters", max),
            (Some(min), None) => format!("must be at least {} characters", min),
            (None, None) => "has an invalid length".to_string(),
        };
        DirectoryError::invalid(self.name, message)
    }
}

/// The employee schema, in serialization order.
pub const EMPLOYEE_SCHEMA: &[FieldConstraint] = &[
    FieldConstraint::output("id", FieldKind::Integer),
    FieldConstraint {
        name: "name",
        kind: FieldKind::Text,
        required: true,
        output_only: false,
        min_len: Some(1),
        max_len: Some(100),
        min_value: None,
    },
    FieldConstraint {
        name: "email",
        kind: FieldKind::Email,
        required: true,
        output_only: false,
        min_len: None,
        max_len: Some(120),
        min_value: None,
    },
    FieldConstraint {
        name: "position",
        kind: FieldKind::Text,
        required: true,
        output_only: false,
        min_len: Some(1),
        max_len: Some(100),
        min_value: None,
    },
    FieldConstraint {
        name: "salary",
        kind: FieldKind::Float,
        required: true,
        output_only: false,
        min_len: None,
        max_len: None,
        min_value: Some(0.0),
    },
    FieldConstraint::output("date_hired", FieldKind::DateTime),
    FieldConstraint {
        name: "profile_picture",
        kind: FieldKind::PictureFilename,
        required: false,
        output_only: false,
        min_len: None,
        max_len: Some(200),
        min_value: None,
    },
];

/// Looks up a field's constraint by name.
pub fn constraint(name: &str) -> Option<&'static FieldConstraint> {
    EMPLOYEE_SCHEMA.iter().find(|c| c.name == name)
}

fn input_fields() -> impl Iterator<Item = &'static FieldConstraint> {
    EMPLOYEE_SCHEMA.iter().filter(|c| !c.output_only)
}

/// Returns true if `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Returns true if `filename` ends in an accepted picture extension.
pub fn has_picture_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| PICTURE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn parse_number(field: &str, value: &str) -> DirectoryResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DirectoryError::invalid(field, "must be a number"))
}

/// Parses a date strictly as zero-padded `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use employee_directory::schema::parse_date;
///
/// assert!(parse_date("2023-01-01").is_ok());
/// assert!(parse_date("2023-1-1").is_err());
/// assert!(parse_date("01/01/2023").is_err());
/// ```
pub fn parse_date(value: &str) -> DirectoryResult<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !shaped {
        return Err(DirectoryError::InvalidDateFormat {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT).map_err(|_| {
        DirectoryError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

/// Parses a `YYYY-MM-DD` date as midnight at the start of that day.
pub fn parse_day_start(value: &str) -> DirectoryResult<NaiveDateTime> {
    Ok(parse_date(value)?.and_time(NaiveTime::MIN))
}

/// Raw employee input, as submitted by a form.
///
/// Values are unparsed strings, validated and stored as submitted. Blank
/// (empty or whitespace-only) values count as absent. There are no
/// `id` or `date_hired` fields: those are output-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayload {
    /// Submitted name.
    #[serde(default)]
    pub name: Option<String>,
    /// Submitted email.
    #[serde(default)]
    pub email: Option<String>,
    /// Submitted position.
    #[serde(default)]
    pub position: Option<String>,
    /// Submitted salary, before numeric coercion.
    #[serde(default)]
    pub salary: Option<String>,
    /// Stored filename of an uploaded picture.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl EmployeePayload {
    /// Builds a payload with the four required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        salary: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            position: Some(position.into()),
            salary: Some(salary.into()),
            profile_picture: None,
        }
    }

    /// Sets the profile picture filename.
    pub fn with_profile_picture(mut self, filename: impl Into<String>) -> Self {
        self.profile_picture = Some(filename.into());
        self
    }

    /// Returns the value of an input field as submitted, or `None` if it is
    /// absent, blank, or not an input field.
    pub fn field(&self, name: &str) -> Option<&str> {
        let raw = match name {
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "position" => self.position.as_deref(),
            "salary" => self.salary.as_deref(),
            "profile_picture" => self.profile_picture.as_deref(),
            _ => None,
        };
        raw.filter(|v| !v.trim().is_empty())
    }

    fn owned(&self, name: &str) -> Option<String> {
        self.field(name).map(str::to_string)
    }

    fn required(&self, name: &str) -> DirectoryResult<String> {
        self.owned(name)
            .ok_or_else(|| DirectoryError::invalid(name, "is required"))
    }
}

/// Checks a creation payload against [`EMPLOYEE_SCHEMA`].
pub fn validate_for_create(payload: &EmployeePayload) -> DirectoryResult<NewEmployee> {
    for constraint in input_fields() {
        match payload.field(constraint.name) {
            Some(value) => constraint.check(value)?,
            None if constraint.required => {
                return Err(DirectoryError::invalid(constraint.name, "is required"));
            }
            None => {}
        }
    }

    let salary = payload.required("salary")?;
    Ok(NewEmployee {
        name: payload.required("name")?,
        email: payload.required("email")?,
        position: payload.required("position")?,
        salary: parse_number("salary", &salary)?,
        profile_picture: payload.owned("profile_picture"),
    })
}

/// Checks an update payload against [`EMPLOYEE_SCHEMA`].
///
/// Only supplied fields are checked; nothing is required.
pub fn validate_for_update(payload: &EmployeePayload) -> DirectoryResult<EmployeeChanges> {
    for constraint in input_fields() {
        if let Some(value) = payload.field(constraint.name) {
            constraint.check(value)?;
        }
    }

    let salary = match payload.field("salary") {
        Some(value) => Some(parse_number("salary", value)?),
        None => None,
    };

    Ok(EmployeeChanges {
        name: payload.owned("name"),
        email: payload.owned("email"),
        position: payload.owned("position"),
        salary,
        profile_picture: payload.owned("profile_picture"),
    })
}

/// Transport-neutral representation of an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Store-generated identifier.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Job title.
    pub position: String,
    /// Annual salary.
    pub salary: f64,
    /// Hire timestamp as `YYYY-MM-DD HH:MM:SS`.
    pub date_hired: String,
    /// Profile picture filename, `null` when absent.
    pub profile_picture: Option<String>,
}

impl From<&Employee> for EmployeeRecord {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
            salary: employee.salary,
            date_hired: employee.date_hired.format(DATE_HIRED_FORMAT).to_string(),
            profile_picture: employee.profile_picture.clone(),
        }
    }
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        Self::from(&employee)
    }
}
