//! One-shot notices shown after a redirect.
//!
//! A notice travels in the `flash` cookie as a short code (for example
//! `created` or `invalid.email`), is rendered by the next `GET /`, and is
//! then cleared. Only codes are stored, so no user input or error detail
//! ever reaches the cookie.

use axum::http::{HeaderMap, header};

use crate::error::DirectoryError;
use crate::schema;

/// Name of the cookie carrying the pending notice.
pub const NOTICE_COOKIE: &str = "flash";

/// The operation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Creating an employee.
    Create,
    /// Updating an employee.
    Update,
    /// Deleting an employee.
    Delete,
}

impl Action {
    fn code(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Update => "updating",
            Self::Delete => "deleting",
        }
    }

    fn parse(code: &str) -> Option<Self> {
        match code {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

impl NoticeLevel {
    /// CSS class name for the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A pending user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An employee was created.
    Created,
    /// An employee was updated.
    Updated,
    /// An employee was deleted.
    Deleted,
    /// The requested employee does not exist.
    NotFound,
    /// The submitted email is already in use.
    DuplicateEmail,
    /// A submitted field broke its schema constraint.
    InvalidField(&'static str),
    /// A submitted date was not `YYYY-MM-DD`.
    InvalidDate,
    /// Anything else; details are only logged.
    Unexpected(Action),
}

impl Notice {
    /// Chooses the notice for a failed `action`.
    pub fn from_error(error: &DirectoryError, action: Action) -> Self {
        match error {
            DirectoryError::InvalidFormat { field, .. } => schema::constraint(field)
                .map(|c| Self::InvalidField(c.name))
                .unwrap_or(Self::Unexpected(action)),
            DirectoryError::DuplicateEmail { .. } => Self::DuplicateEmail,
            DirectoryError::NotFound { .. } => Self::NotFound,
            DirectoryError::InvalidDateFormat { .. } => Self::InvalidDate,
            _ => Self::Unexpected(action),
        }
    }

    /// The cookie-safe code for this notice.
    pub fn code(&self) -> String {
        match self {
            Self::Created => "created".to_string(),
            Self::Updated => "updated".to_string(),
            Self::Deleted => "deleted".to_string(),
            Self::NotFound => "not_found".to_string(),
            Self::DuplicateEmail => "duplicate_email".to_string(),
            Self::InvalidField(field) => format!("invalid.{}", field),
            Self::InvalidDate => "invalid_date".to_string(),
            Self::Unexpected(action) => format!("unexpected.{}", action.code()),
        }
    }

    /// Parses a code produced by [`Notice::code`].
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "not_found" => Some(Self::NotFound),
            "duplicate_email" => Some(Self::DuplicateEmail),
            "invalid_date" => Some(Self::InvalidDate),
            _ => {
                if let Some(field) = code.strip_prefix("invalid.") {
                    schema::constraint(field)
                        .filter(|c| !c.output_only)
                        .map(|c| Self::InvalidField(c.name))
                } else if let Some(action) = code.strip_prefix("unexpected.") {
                    Action::parse(action).map(Self::Unexpected)
                } else {
                    None
                }
            }
        }
    }

    /// Success or error.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Created | Self::Updated | Self::Deleted => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Created => "Employee created successfully!".to_string(),
            Self::Updated => "Employee updated successfully!".to_string(),
            Self::Deleted => "Employee deleted successfully!".to_string(),
            Self::NotFound => "Employee not found!".to_string(),
            Self::DuplicateEmail => "Employee with this email already exists".to_string(),
            Self::InvalidField("email") => "Invalid email format".to_string(),
            Self::InvalidField("salary") => "Salary must be a non-negative number".to_string(),
            Self::InvalidField("profile_picture") => {
                "Profile picture must be a .png, .jpg, or .jpeg file.".to_string()
            }
            Self::InvalidField(field) => match schema::constraint(field).and_then(|c| c.max_len) {
                Some(max) => format!("{} must be between 1 and {} characters", capitalize(field), max),
                None => format!("Invalid {}", field),
            },
            Self::InvalidDate => "Invalid date format. Please use YYYY-MM-DD.".to_string(),
            Self::Unexpected(action) => format!(
                "An unexpected error occurred while {} the employee.",
                action.verb()
            ),
        }
    }

    /// `Set-Cookie` value storing this notice.
    pub fn set_cookie(&self, secure: bool) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
            NOTICE_COOKIE,
            self.code(),
            if secure { "; Secure" } else { "" }
        )
    }

    /// `Set-Cookie` value removing any stored notice.
    pub fn clear_cookie() -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", NOTICE_COOKIE)
    }

    /// Reads the pending notice from the request's `Cookie` headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == NOTICE_COOKIE)
            .and_then(|(_, code)| Self::parse(code))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_codes_parse_back() {
        let notices = [
            Notice::Created,
            Notice::Updated,
            Notice::Deleted,
            Notice::NotFound,
            Notice::DuplicateEmail,
            Notice::InvalidField("email"),
            Notice::InvalidDate,
            Notice::Unexpected(Action::Delete),
        ];
        for notice in notices {
            assert_eq!(Notice::parse(&notice.code()), Some(notice));
        }
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        assert_eq!(Notice::parse("hello"), None);
        assert_eq!(Notice::parse("invalid.id"), None);
        assert_eq!(Notice::parse("invalid.password"), None);
        assert_eq!(Notice::parse("unexpected.launch"), None);
    }

    #[test]
    fn test_from_error_maps_user_errors() {
        let action = Action::Create;
        assert_eq!(
            Notice::from_error(&DirectoryError::invalid("email", "bad"), action),
            Notice::InvalidField("email")
        );
        assert_eq!(
            Notice::from_error(
                &DirectoryError::DuplicateEmail {
                    email: "a@b.com".to_string()
                },
                action
            ),
            Notice::DuplicateEmail
        );
        assert_eq!(
            Notice::from_error(&DirectoryError::NotFound { id: 1 }, action),
            Notice::NotFound
        );
    }

    #[test]
    fn test_from_error_hides_system_failures() {
        let error = DirectoryError::PersistenceFailure(sqlx::Error::PoolTimedOut);
        let notice = Notice::from_error(&error, Action::Update);
        assert_eq!(notice, Notice::Unexpected(Action::Update));
        assert_eq!(
            notice.message(),
            "An unexpected error occurred while updating the employee."
        );
        assert_eq!(notice.level(), NoticeLevel::Error);
    }

    #[test]
    fn test_messages() {
        assert_eq!(Notice::Created.message(), "Employee created successfully!");
        assert_eq!(Notice::Created.level(), NoticeLevel::Success);
        assert_eq!(Notice::InvalidField("email").message(), "Invalid email format");
        assert_eq!(
            Notice::InvalidField("name").message(),
            "Name must be between 1 and 100 characters"
        );
    }

    #[test]
    fn test_cookie_round_trip_through_headers() {
        let set = Notice::DuplicateEmail.set_cookie(true);
        assert!(set.starts_with("flash=duplicate_email;"));
        assert!(set.ends_with("; Secure"));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; flash=duplicate_email"),
        );
        assert_eq!(Notice::from_headers(&headers), Some(Notice::DuplicateEmail));

        assert_eq!(Notice::from_headers(&HeaderMap::new()), None);
    }
}
