//! HTTP layer for the employee directory.
//!
//! Serves the HTML pages and form handlers, the AJAX search endpoint and
//! the JSON utility endpoints under `/api`.

mod handlers;
mod notice;
mod pages;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use notice::{Action, Notice, NoticeLevel, NOTICE_COOKIE};
pub use request::{
    EmployeeForm, EmployeeFormRejection, HireDateRequest, HiredAfterQuery, SearchQuery,
    UploadedPicture,
};
pub use response::{ApiError, ApiErrorResponse, HiredAfterResponse, SearchResponse};
pub use state::AppState;
