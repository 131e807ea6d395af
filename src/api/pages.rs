//! Server-rendered HTML pages.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::models::Employee;

use super::notice::Notice;

/// The directory page. The list itself is fetched by `static/js/main.js`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// `success` or `error`; empty when there is no notice.
    pub notice_level: &'static str,
    /// The notice text; empty when there is no notice.
    pub notice_message: String,
}

impl IndexPage {
    /// Builds the page, showing `notice` if there is one.
    pub fn new(notice: Option<&Notice>) -> Self {
        match notice {
            Some(notice) => Self {
                notice_level: notice.level().as_str(),
                notice_message: notice.message(),
            },
            None => Self {
                notice_level: "",
                notice_message: String::new(),
            },
        }
    }
}

/// The add-employee form.
#[derive(Template)]
#[template(path = "add_employee.html")]
pub struct AddEmployeePage;

/// The edit form, prefilled with the employee's current values.
#[derive(Template)]
#[template(path = "edit_employee.html")]
pub struct EditEmployeePage {
    /// Employee id, used in the form action.
    pub id: i64,
    /// Current name.
    pub name: String,
    /// Current email.
    pub email: String,
    /// Current position.
    pub position: String,
    /// Current salary as entered text.
    pub salary: String,
    /// Current picture filename; empty when there is none.
    pub profile_picture: String,
}

impl From<&Employee> for EditEmployeePage {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
            salary: employee.salary.to_string(),
            profile_picture: employee.profile_picture.clone().unwrap_or_default(),
        }
    }
}

/// Shown for unknown routes.
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage;

/// Shown when a page cannot be served.
#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorPage;

/// Renders `page`, falling back to a bare 500 if the template fails.
pub fn render<T: Template>(page: T) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
