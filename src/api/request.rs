//! Request types for the employee directory HTTP layer.
//!
//! Employee forms arrive either URL-encoded or as `multipart/form-data`
//! carrying a profile picture. [`EmployeeForm`] accepts both.

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
        FromRequest, Multipart, Request,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::schema::EmployeePayload;

/// Name of the form part holding the picture file.
pub const PICTURE_FIELD: &str = "profile_picture";

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search term; blank lists everyone.
    #[serde(default)]
    pub q: String,
}

/// Query string of `GET /api/employees/hired-after`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiredAfterQuery {
    /// Cutoff date as `YYYY-MM-DD`.
    pub date: String,
}

/// Body of `PUT /api/employees/:id/date-hired`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HireDateRequest {
    /// New hire date as `YYYY-MM-DD`.
    pub date: String,
}

/// A picture file attached to an employee form.
#[derive(Debug, Clone)]
pub struct UploadedPicture {
    /// Filename as sent by the client, unsanitized.
    pub filename: String,
    /// File contents.
    pub contents: Bytes,
}

/// A submitted add or edit form.
#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    /// Text fields. `profile_picture` is never taken from the client here;
    /// it is filled in once an upload has been stored.
    pub payload: EmployeePayload,
    /// The attached picture, if a file was chosen.
    pub picture: Option<UploadedPicture>,
}

impl EmployeeForm {
    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.payload.name,
            "email" => &mut self.payload.email,
            "position" => &mut self.payload.position,
            "salary" => &mut self.payload.salary,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// An employee form body that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFormRejection {
    status: StatusCode,
    message: String,
}

impl EmployeeFormRejection {
    /// Status the underlying extractor would have answered with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Human-readable reason.
    pub fn body_text(&self) -> &str {
        &self.message
    }
}

impl From<FormRejection> for EmployeeFormRejection {
    fn from(rejection: FormRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for EmployeeFormRejection {
    fn from(rejection: MultipartRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for EmployeeFormRejection {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for EmployeeFormRejection {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

#[async_trait]
impl<S> FromRequest<S> for EmployeeForm
where
    S: Send + Sync,
{
    type Rejection = EmployeeFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(mut payload) = Form::<EmployeePayload>::from_request(req, state).await?;
            payload.profile_picture = None;
            return Ok(Self {
                payload,
                picture: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state).await?;

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PICTURE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let contents = field.bytes().await?;
                // an empty file input still sends a part, with no filename
                if !filename.is_empty() {
                    form.picture = Some(UploadedPicture { filename, contents });
                }
                continue;
            }

            let value = field.text().await?;
            form.set_text(&name, value);
        }

        Ok(form)
    }
}
